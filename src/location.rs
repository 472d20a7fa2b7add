//! Call-site identification.
//!
//! There is no stack walking here. A location is captured where the log
//! call is written, either through `#[track_caller]` on the [`Logger`]
//! methods or through the [`here!`](crate::here) macro used by the
//! `log_*!` macros.
//!
//! [`Logger`]: crate::logger::Logger

use std::borrow::Cow;
use std::fmt;
use std::panic::Location;

/// Source position of a single log call.
///
/// `type_name` is the originating type or module path (or the source file
/// when only that is known), `method_name` the enclosing function when it
/// could be determined. A missing location is
/// modelled as `Option<SourceLocation>::None` by callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub type_name: Cow<'static, str>,
    pub method_name: Option<Cow<'static, str>>,
    pub line: u32,
}

const MARKER_FN: &str = "::__here";
const CLOSURE_SEGMENT: &str = "::{{closure}}";

impl SourceLocation {
    pub fn new(
        type_name: impl Into<Cow<'static, str>>,
        method_name: impl Into<Cow<'static, str>>,
        line: u32,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            method_name: Some(method_name.into()),
            line,
        }
    }

    /// Location without a known function name.
    pub fn without_method(type_name: impl Into<Cow<'static, str>>, line: u32) -> Self {
        Self {
            type_name: type_name.into(),
            method_name: None,
            line,
        }
    }

    /// Location of whoever called the `#[track_caller]` function this is
    /// invoked from, identified by its source file and line.
    ///
    /// The function name is not recoverable from [`std::panic::Location`];
    /// use [`here!`](crate::here) where it is needed.
    #[track_caller]
    pub fn caller() -> Self {
        let location = Location::caller();
        Self::without_method(location.file(), location.line())
    }

    /// Build a location from the `std::any::type_name` of a marker function
    /// declared inside the calling function. Used by [`here!`](crate::here).
    ///
    /// `item_path` looks like `app::handlers::Session::close::__here`,
    /// possibly with `{{closure}}` segments for closures and async blocks.
    /// Falls back to `module` with no method when the path has no
    /// enclosing function.
    #[doc(hidden)]
    pub fn from_item_path(item_path: &'static str, module: &'static str, line: u32) -> Self {
        let mut path = item_path.strip_suffix(MARKER_FN).unwrap_or(item_path);
        while let Some(stripped) = path.strip_suffix(CLOSURE_SEGMENT) {
            path = stripped;
        }

        match path.rsplit_once("::") {
            Some((owner, function)) if !owner.is_empty() && !function.is_empty() => {
                Self::new(owner, function, line)
            }
            _ => Self::without_method(module, line),
        }
    }
}

impl fmt::Display for SourceLocation {
    /// `type:method:line`, or `type:line` when the method is unknown.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.method_name {
            Some(method) => write!(f, "{}:{}:{}", self.type_name, method, self.line),
            None => write!(f, "{}:{}", self.type_name, self.line),
        }
    }
}

/// Capture the [`SourceLocation`] of the place this macro is expanded in:
/// the enclosing type or module, the enclosing function, and the line.
#[macro_export]
macro_rules! here {
    () => {{
        fn __here() {}
        fn __item_path<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        $crate::location::SourceLocation::from_item_path(
            __item_path(__here),
            ::std::module_path!(),
            ::std::line!(),
        )
    }};
}
