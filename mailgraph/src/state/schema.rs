//! `workflow_state!`: declares a state schema and its patch type in one place.

/// Declares a workflow state struct, its patch struct, and the per-field merge.
///
/// Every field is tagged with its reducer (`replace` or `append`; `append` fields must be
/// `Vec<T>`). The control fields `item_id`, `current_step`, `next_step` and `error` are added
/// to every schema with the Replace reducer. Both generated structs derive
/// `Clone, Debug, Default, PartialEq`; extra attributes apply to the state struct only.
///
/// ```rust
/// mailgraph::workflow_state! {
///     pub struct TicketState, patch TicketPatch {
///         replace priority: u8,
///         append audit: Vec<String>,
///     }
/// }
///
/// use mailgraph::{merge, WorkflowState};
///
/// let state = TicketState::seed("T-1");
/// let patch = TicketPatch { priority: Some(2), ..Default::default() };
/// assert_eq!(merge(&state, &patch).priority, 2);
/// ```
#[macro_export]
macro_rules! workflow_state {
    (@merge replace, $old:expr, $new:expr) => {
        $crate::state::replace(&mut $old, &$new)
    };
    (@merge append, $old:expr, $new:expr) => {
        $crate::state::append(&mut $old, &$new)
    };
    (@kind replace) => {
        $crate::state::Reducer::Replace
    };
    (@kind append) => {
        $crate::state::Reducer::Append
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $state:ident, patch $patch:ident {
            $(
                $(#[$fmeta:meta])*
                $reducer:ident $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq)]
        $vis struct $state {
            /// Identifier of the unit of work.
            pub item_id: String,
            /// Step the run is at; a sentinel once the run is over.
            pub current_step: String,
            /// Names the downstream step that routed into a shared step.
            pub next_step: String,
            /// Failure message; non-empty exactly when the run failed.
            pub error: String,
            $(
                $(#[$fmeta])*
                pub $field: $ty,
            )*
        }

        #[doc = concat!("Partial update for [`", stringify!($state), "`]; `None` fields are left untouched.")]
        #[derive(Clone, Debug, Default, PartialEq)]
        $vis struct $patch {
            pub item_id: Option<String>,
            pub current_step: Option<String>,
            pub next_step: Option<String>,
            pub error: Option<String>,
            $(
                pub $field: Option<$ty>,
            )*
        }

        impl $state {
            /// Schema defaults with the given item id.
            pub fn seed(item_id: impl Into<String>) -> Self {
                Self {
                    item_id: item_id.into(),
                    ..Default::default()
                }
            }
        }

        impl $crate::state::StatePatch for $patch {
            fn current_step(&self) -> Option<&str> {
                self.current_step.as_deref()
            }

            fn goto(step: impl Into<String>) -> Self {
                Self {
                    current_step: Some(step.into()),
                    ..Default::default()
                }
            }

            fn failure(message: impl Into<String>) -> Self {
                <Self as $crate::state::StatePatch>::into_failure(Self::default(), message)
            }

            fn error(&self) -> Option<&str> {
                self.error.as_deref().filter(|e| !e.is_empty())
            }

            fn into_failure(self, message: impl Into<String>) -> Self {
                Self {
                    current_step: Some($crate::state::ERROR.to_string()),
                    error: Some(message.into()),
                    ..self
                }
            }
        }

        impl $crate::state::WorkflowState for $state {
            type Patch = $patch;

            fn merge_patch(&mut self, patch: &$patch) {
                $crate::state::replace(&mut self.item_id, &patch.item_id);
                $crate::state::replace(&mut self.current_step, &patch.current_step);
                $crate::state::replace(&mut self.next_step, &patch.next_step);
                $crate::state::replace(&mut self.error, &patch.error);
                $(
                    $crate::workflow_state!(@merge $reducer, self.$field, patch.$field);
                )*
            }

            fn reducers() -> Vec<(&'static str, $crate::state::Reducer)> {
                vec![
                    ("item_id", $crate::state::Reducer::Replace),
                    ("current_step", $crate::state::Reducer::Replace),
                    ("next_step", $crate::state::Reducer::Replace),
                    ("error", $crate::state::Reducer::Replace),
                    $(
                        (stringify!($field), $crate::workflow_state!(@kind $reducer)),
                    )*
                ]
            }

            fn item_id(&self) -> &str {
                &self.item_id
            }

            fn current_step(&self) -> &str {
                &self.current_step
            }

            fn set_current_step(&mut self, step: &str) {
                self.current_step = step.to_string();
            }

            fn next_step(&self) -> &str {
                &self.next_step
            }

            fn error(&self) -> Option<&str> {
                if self.error.is_empty() {
                    None
                } else {
                    Some(&self.error)
                }
            }
        }
    };
}
