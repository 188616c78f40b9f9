//! Integration tests for loss functions
