//! Data transformations for reduction forecasting.
//!
//! # Example
//!
//! ```
//! use anofox_reduction::transform::{last_window, sliding_windows_multi};
//!
//! let series = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
//!
//! // Windows of length 2 with targets one and two steps ahead
//! let table = sliding_windows_multi(&series, 2, &[1, 2]).unwrap();
//! assert_eq!(table.len(), 3);
//!
//! // The window a forecast starts from
//! assert_eq!(last_window(&series, 2).unwrap(), &[5.0, 6.0]);
//! ```

pub mod window;

pub use window::{last_window, sliding_windows, sliding_windows_multi, TrainingTable};
