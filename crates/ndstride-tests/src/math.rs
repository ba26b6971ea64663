//! Elementwise arithmetic tests - NumPy compatible
