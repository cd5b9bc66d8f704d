use num_traits::Float;
use thiserror::Error;

/// A floating point value that is guaranteed to be neither NaN nor infinite.
#[derive(Clone, Copy, Debug)]
pub struct Finite<T>(T)
where
	T: Float;

#[derive(Debug, Error, PartialEq)]
#[error("not finite")]
pub struct NotFiniteError;

impl<T> Finite<T>
where
	T: Float,
{
	pub fn new(value: T) -> Result<Self, NotFiniteError> {
		if value.is_finite() {
			Ok(Self(value))
		} else {
			Err(NotFiniteError)
		}
	}

	pub fn get(self) -> T {
		self.0
	}
}

pub trait ToFinite<T>
where
	T: Float,
{
	/// If the value is finite, return `Ok(Finite(self))`, otherwise return `Err(NotFiniteError)`.
	fn to_finite(self) -> Result<Finite<T>, NotFiniteError>;
}

impl<T> ToFinite<T> for T
where
	T: Float,
{
	fn to_finite(self) -> Result<Finite<T>, NotFiniteError> {
		Finite::new(self)
	}
}

#[test]
fn test_finite() {
	assert_eq!(0.25f64.to_finite().map(Finite::get), Ok(0.25));
	assert_eq!(Finite::new(-1e300f64).map(Finite::get), Ok(-1e300));
	assert_eq!(f64::NAN.to_finite().map(Finite::get), Err(NotFiniteError));
	assert_eq!(f64::INFINITY.to_finite().map(Finite::get), Err(NotFiniteError));
	assert_eq!(f32::NEG_INFINITY.to_finite().map(Finite::get), Err(NotFiniteError));
}
