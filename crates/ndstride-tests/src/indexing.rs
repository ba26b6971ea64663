//! Indexing, slicing and masking tests - NumPy compatible
