mod availability_test;
mod middleware_test;
mod occupancy_test;
mod provider_test;
mod schedule_test;
