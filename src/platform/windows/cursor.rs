//! Win32 cursor driver.
//!
//! Coordinates are physical virtual-screen pixels as long as the process is
//! per-monitor DPI aware (set in the entry point before any window exists).

use windows::Win32::Foundation::POINT;
use windows::Win32::UI::WindowsAndMessaging::{GetCursorPos, SetCursorPos};

use crate::driver::CursorDriver;
use crate::error::CursorAccessError;
use crate::model::Point;

/// Reads and warps the system cursor.
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32Cursor;

impl Win32Cursor {
    pub fn new() -> Self {
        Self
    }
}

impl CursorDriver for Win32Cursor {
    fn get_position(&mut self) -> Result<Point, CursorAccessError> {
        let mut cursor = POINT::default();
        unsafe { GetCursorPos(&mut cursor) }
            .map_err(|e| CursorAccessError::Read(e.to_string()))?;
        Ok(Point::new(cursor.x, cursor.y))
    }

    fn set_position(&mut self, point: Point) -> Result<(), CursorAccessError> {
        unsafe { SetCursorPos(point.x, point.y) }
            .map_err(|e| CursorAccessError::Write(e.to_string()))
    }
}
