//! Unit tests for the task workflow engine.

mod support;

mod deadline_tests;
mod domain_tests;
mod lifecycle_tests;
