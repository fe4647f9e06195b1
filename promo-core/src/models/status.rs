/// The lifecycle phase of a bundle relative to a point in time.
///
/// This is derived on every read from `(now, start, end)` and never stored;
/// a bundle crosses from `Scheduled` to `Active` to `Finished` purely by the
/// clock advancing. Note the endpoints: a bundle is `Active` through its end
/// instant inclusive, a display convention; the overlap rule uses half-open
/// windows and is unrelated.
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BundleStatus {
    /// The window has not opened yet (`now < start`)
    Scheduled,
    /// The window is open (`start <= now <= end`)
    Active,
    /// The window has closed (`now > end`)
    Finished,
}

impl BundleStatus {
    /// Derive the status of a window at the given instant.
    pub fn derive<DateTime: PartialOrd>(now: &DateTime, start: &DateTime, end: &DateTime) -> Self {
        if now < start {
            Self::Scheduled
        } else if now > end {
            Self::Finished
        } else {
            Self::Active
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_phases() {
        assert_eq!(BundleStatus::derive(&5, &10, &20), BundleStatus::Scheduled);
        assert_eq!(BundleStatus::derive(&10, &10, &20), BundleStatus::Active);
        assert_eq!(BundleStatus::derive(&15, &10, &20), BundleStatus::Active);
        assert_eq!(BundleStatus::derive(&20, &10, &20), BundleStatus::Active);
        assert_eq!(BundleStatus::derive(&21, &10, &20), BundleStatus::Finished);
    }
}
