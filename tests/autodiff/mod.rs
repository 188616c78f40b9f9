//! Integration tests for the differentiation of user models
//!
//! These tests check dual-number derivatives against closed forms.

// Tests for derivatives of elementary functions through Dual64
mod dual_tests;

// Tests for per-argument partial derivatives and Jacobians
mod partial_tests;
