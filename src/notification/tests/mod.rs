//! Tests for the notification context.
