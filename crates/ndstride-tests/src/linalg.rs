//! Matrix product tests - NumPy compatible
