pub use num_traits::ToPrimitive;
