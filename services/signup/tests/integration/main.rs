
mod add_employee_test;
mod contract_test;
mod redeem_owner_test;
mod router_test;
