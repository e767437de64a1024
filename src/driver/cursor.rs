//! Cursor position access.

use crate::error::CursorAccessError;
use crate::model::Point;

/// Read and write the OS cursor position.
///
/// Both calls run on the enforcement thread at tick frequency and must
/// return in well under a millisecond. Setting the current position again is
/// a visual no-op.
pub trait CursorDriver: Send {
    fn get_position(&mut self) -> Result<Point, CursorAccessError>;

    fn set_position(&mut self, position: Point) -> Result<(), CursorAccessError>;
}

impl<D: CursorDriver + ?Sized> CursorDriver for Box<D> {
    fn get_position(&mut self) -> Result<Point, CursorAccessError> {
        (**self).get_position()
    }

    fn set_position(&mut self, position: Point) -> Result<(), CursorAccessError> {
        (**self).set_position(position)
    }
}
