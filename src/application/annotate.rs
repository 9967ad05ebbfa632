//! Call-site annotated errors
//!
//! An [`AnnotatedError`] is a stack of (message, source location) frames over an
//! optional cause. It renders outer to inner, joined by `": "`:
//!
//! ```text
//! failed to read gist (file: gist.rs, line: 88): gh command failed (exit code 1): HTTP 404
//! ```
//!
//! Locations are captured with `#[track_caller]` and kept as structured data.
//! Whether a frame prints its ` (file: .., line: ..)` suffix is decided when
//! that frame is built: either from an explicit [`Annotator`] or from the
//! process-wide default ([`set_position_annotation`]). Wrapping never changes
//! the setting of frames already in the chain.

use std::error::Error as StdError;
use std::fmt;
use std::panic::Location;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

/// Boxed, thread-safe error used as the innermost cause.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

static POSITION_ANNOTATION: AtomicBool = AtomicBool::new(true);

/// Enable or disable the ` (file: .., line: ..)` suffix for errors built
/// afterwards through the process-wide default.
///
/// Meant to be called once during startup (or from a test binary of its own).
pub fn set_position_annotation(enabled: bool) {
    POSITION_ANNOTATION.store(enabled, Ordering::Relaxed);
}

pub fn position_annotation_enabled() -> bool {
    POSITION_ANNOTATION.load(Ordering::Relaxed)
}

/// One message plus the place it was attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    pub message: &'a str,
    pub location: &'static Location<'static>,
    /// Position suffix setting in effect when the frame was built
    pub positions: bool,
}

impl Frame<'_> {
    /// Basename of the source file.
    pub fn file_name(&self) -> &'static str {
        let file = self.location.file();
        Path::new(file)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(file)
    }

    pub fn line(&self) -> u32 {
        self.location.line()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RawFrame {
    message: String,
    location: &'static Location<'static>,
    positions: bool,
}

/// Error carrying a chain of call-site annotated messages.
#[derive(Debug)]
pub struct AnnotatedError {
    /// Outermost first
    frames: Vec<RawFrame>,
    cause: Option<BoxError>,
}

impl AnnotatedError {
    /// New error from a literal message.
    #[track_caller]
    pub fn msg(message: impl fmt::Display) -> Self {
        Annotator::global().error(message)
    }

    /// New error from a format template; see [`annotated!`](crate::annotated).
    #[track_caller]
    pub fn from_args(args: fmt::Arguments<'_>) -> Self {
        Annotator::global().error(args)
    }

    /// Attach `message` to `err` at the caller's location.
    ///
    /// Wrapping another `AnnotatedError` extends its chain instead of nesting.
    #[track_caller]
    pub fn wrap<E>(err: E, message: impl fmt::Display) -> Self
    where
        E: Into<BoxError>,
    {
        Annotator::global().wrap(err, message)
    }

    /// Re-wrap `err` without adding a message, keeping it reachable via `source()`.
    pub fn from_error<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        let boxed: BoxError = err.into();
        match boxed.downcast::<AnnotatedError>() {
            Ok(inner) => *inner,
            Err(other) => Self {
                frames: Vec::new(),
                cause: Some(other),
            },
        }
    }

    /// Frames, outermost first.
    pub fn frames(&self) -> impl Iterator<Item = Frame<'_>> {
        self.frames.iter().map(|f| Frame {
            message: &f.message,
            location: f.location,
            positions: f.positions,
        })
    }

    /// The wrapped cause, if this error was built from another error.
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Find the first error of type `T` in the cause chain.
    pub fn find_cause<T: StdError + 'static>(&self) -> Option<&T> {
        let mut current: Option<&(dyn StdError + 'static)> = self.source();
        while let Some(err) = current {
            if let Some(found) = err.downcast_ref::<T>() {
                return Some(found);
            }
            current = err.source();
        }
        None
    }

    /// Whether the outermost frame prints its position suffix.
    pub fn positions(&self) -> bool {
        self.frames.first().map_or_else(position_annotation_enabled, |f| f.positions)
    }

    /// Render the chain with ` (file: .., line: ..)` forced on or off for every frame.
    pub fn render(&self, with_positions: bool) -> String {
        self.render_with(|_| with_positions)
    }

    fn render_with(&self, positions: impl Fn(&Frame<'_>) -> bool) -> String {
        let mut parts: Vec<String> = self
            .frames()
            .map(|frame| {
                if positions(&frame) {
                    format!(
                        "{} (file: {}, line: {})",
                        frame.message,
                        frame.file_name(),
                        frame.line()
                    )
                } else {
                    frame.message.to_string()
                }
            })
            .collect();

        if let Some(cause) = &self.cause {
            parts.push(cause.to_string());
        }
        parts.join(": ")
    }

    fn push_front(mut self, frame: RawFrame) -> Self {
        self.frames.insert(0, frame);
        self
    }
}

impl fmt::Display for AnnotatedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_with(|frame| frame.positions))
    }
}

impl StdError for AnnotatedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

/// Builds annotated errors with an explicit position setting, independent of
/// the process-wide default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Annotator {
    pub positions: bool,
}

impl Default for Annotator {
    fn default() -> Self {
        Self { positions: true }
    }
}

impl Annotator {
    pub fn new(positions: bool) -> Self {
        Self { positions }
    }

    /// Annotator following the current process-wide setting.
    pub fn global() -> Self {
        Self::new(position_annotation_enabled())
    }

    #[track_caller]
    pub fn error(&self, message: impl fmt::Display) -> AnnotatedError {
        AnnotatedError {
            frames: vec![RawFrame {
                message: message.to_string(),
                location: Location::caller(),
                positions: self.positions,
            }],
            cause: None,
        }
    }

    #[track_caller]
    pub fn wrap<E>(&self, err: E, message: impl fmt::Display) -> AnnotatedError
    where
        E: Into<BoxError>,
    {
        let frame = RawFrame {
            message: message.to_string(),
            location: Location::caller(),
            positions: self.positions,
        };

        let boxed: BoxError = err.into();
        match boxed.downcast::<AnnotatedError>() {
            Ok(inner) => (*inner).push_front(frame),
            Err(other) => AnnotatedError {
                frames: vec![frame],
                cause: Some(other),
            },
        }
    }

    /// `None` stays `None`; `Some(err)` is wrapped with `message`.
    #[track_caller]
    pub fn wrap_if_err<E>(&self, err: Option<E>, message: impl fmt::Display) -> Option<AnnotatedError>
    where
        E: Into<BoxError>,
    {
        match err {
            Some(err) => Some(self.wrap(err, message)),
            None => None,
        }
    }
}

/// `None` stays `None`; `Some(err)` is wrapped with `message` at the caller's location.
#[track_caller]
pub fn wrap_if_err<E>(err: Option<E>, message: impl fmt::Display) -> Option<AnnotatedError>
where
    E: Into<BoxError>,
{
    Annotator::global().wrap_if_err(err, message)
}

/// Attach call-site annotated messages to the error side of a `Result`.
///
/// `Ok` values pass through untouched.
pub trait Annotate<T> {
    /// Convert the error into an [`AnnotatedError`] without adding a message.
    fn annotate(self) -> Result<T, AnnotatedError>;

    fn wrap_err<M: fmt::Display>(self, message: M) -> Result<T, AnnotatedError>;

    fn wrap_err_with<M, F>(self, message: F) -> Result<T, AnnotatedError>
    where
        M: fmt::Display,
        F: FnOnce() -> M;
}

impl<T, E> Annotate<T> for Result<T, E>
where
    E: Into<BoxError>,
{
    fn annotate(self) -> Result<T, AnnotatedError> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(AnnotatedError::from_error(err)),
        }
    }

    #[track_caller]
    fn wrap_err<M: fmt::Display>(self, message: M) -> Result<T, AnnotatedError> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(AnnotatedError::wrap(err, message)),
        }
    }

    #[track_caller]
    fn wrap_err_with<M, F>(self, message: F) -> Result<T, AnnotatedError>
    where
        M: fmt::Display,
        F: FnOnce() -> M,
    {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(AnnotatedError::wrap(err, message())),
        }
    }
}

/// Build an [`AnnotatedError`] from a format template at the call site.
///
/// ```
/// let err = gisty::annotated!("{} error message(s)", 3);
/// assert!(err.to_string().starts_with("3 error message(s)"));
/// ```
#[macro_export]
macro_rules! annotated {
    ($($arg:tt)+) => {
        $crate::application::annotate::AnnotatedError::from_args(::std::format_args!($($arg)+))
    };
}
