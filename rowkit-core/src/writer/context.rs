/// Statement section being written, lets the writers render a value differently depending on
/// where it lands.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment {
    #[default]
    None,
    SqlSelect,
    SqlInsertInto,
    SqlInsertIntoValues,
    SqlUpdate,
    SqlUpdateSet,
    SqlDeleteFrom,
    SqlWhere,
}

/// How timestamps are written in INSERT values and UPDATE assignments.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampPolicy {
    /// The current local time replaces the supplied value.
    #[default]
    Current,
    /// The supplied value is written.
    Supplied,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context {
    pub fragment: Fragment,
    pub timestamps: TimestampPolicy,
}

impl Context {
    pub fn new(fragment: Fragment, timestamps: TimestampPolicy) -> Self {
        Self {
            fragment,
            timestamps,
        }
    }

    /// Same settings, different fragment.
    pub fn switch_fragment(&self, fragment: Fragment) -> Self {
        Self { fragment, ..*self }
    }

    /// Whether a timestamp written now must be replaced by the current time.
    pub fn stamps_timestamps(&self) -> bool {
        self.timestamps == TimestampPolicy::Current
            && matches!(
                self.fragment,
                Fragment::SqlInsertIntoValues | Fragment::SqlUpdateSet
            )
    }
}
