/// Classification for how an enrichment run reacts to a provider error.
///
/// | Class | Item outcome | Pacer |
/// |-------|--------------|-------|
/// | `Never` | recorded as a per-item error | no wait |
/// | `AfterCooldown` | recorded as throttled | cooldown wait |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Terminal for the current item. Retrying the same call won't help
    /// within this run (bad payload, auth failure, server error).
    Never,

    /// The provider is throttling the caller (HTTP 429).
    ///
    /// The caller must back off for the cooldown before the next call.
    /// Whether the same item is attempted again is the caller's policy.
    AfterCooldown,
}
