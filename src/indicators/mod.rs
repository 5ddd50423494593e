// =============================================================================
// Indicator pipeline
// =============================================================================
//
// Pure, side-effect-free stages of the ADX computation, leaf to root:
// raw True Range and Directional Movement, Wilder running-sum smoothing,
// and the derived DI/DX/ADX sheet. Every stage returns one value per input
// row and represents spreadsheet blanks as `None`, never as zero.

pub mod adx;
pub mod directional;
pub mod true_range;
pub mod wilder;

pub use adx::{calculate_adx_sheet, AdxSheet};
