//! Field extractors: four independent, stateless passes over one
//! [`SourceDocument`](crate::pipeline::source::SourceDocument).
//!
//! ```text
//!                 ┌─▶ course      ──▶ CourseInfo
//! SourceDocument ─┼─▶ assignments ──▶ Vec<Assignment>
//! (text, tables)  ├─▶ schedule    ──▶ Vec<ScheduleItem>
//!                 └─▶ dates       ──▶ Vec<ImportantDate>
//! ```
//!
//! Every extractor is a pure function of its input: line-oriented keyword
//! gates followed by ordered regex cascades where the first pattern that
//! matches supplies the value. None of them can fail; a missing value is the
//! empty string. Because they share nothing mutable they can run on separate
//! threads (see [`crate::parse::parse_concurrent`]).

pub mod assignments;
pub mod course;
pub mod dates;
pub(crate) mod patterns;
pub mod schedule;

pub use assignments::extract_assignments;
pub use course::extract_course_info;
pub use dates::extract_important_dates;
pub use schedule::extract_schedule;
