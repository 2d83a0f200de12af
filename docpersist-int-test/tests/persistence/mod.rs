mod crud_test;
mod paging_test;
mod projection_test;
mod query_builder_test;
mod random_test;
