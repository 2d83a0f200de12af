mod connection_lifecycle_test;
mod resolution_test;
mod uri_composition_test;
