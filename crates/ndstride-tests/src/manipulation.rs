//! Shape manipulation tests - NumPy compatible
