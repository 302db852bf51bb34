//! Cross-module tests that drive whole ticks through the collision manager
