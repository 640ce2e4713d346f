use serde::{Deserialize, Serialize};

/// Stages of a linear experiment timeline
pub trait Phase: Copy + Clone + PartialEq + Send + Sync + std::fmt::Debug + Default {
    fn next(&self) -> Option<Self>;

    /// Whether this phase holds the main scored trials
    fn is_trial(&self) -> bool {
        false
    }

    fn is_practice(&self) -> bool {
        false
    }
}

#[derive(Copy, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StandardPhase {
    #[default]
    Instructions,
    Practice,
    Trials,
    Descriptor,
    Debrief,
}

impl Phase for StandardPhase {
    fn next(&self) -> Option<Self> {
        use StandardPhase::*;
        Some(match self {
            Instructions => Practice,
            Practice => Trials,
            Trials => Descriptor,
            Descriptor => Debrief,
            Debrief => return None,
        })
    }

    fn is_trial(&self) -> bool {
        matches!(self, StandardPhase::Trials)
    }

    fn is_practice(&self) -> bool {
        matches!(self, StandardPhase::Practice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_run_once_in_order() {
        let mut phase = StandardPhase::default();
        let mut seen = vec![phase];
        while let Some(next) = phase.next() {
            assert!(next > phase);
            phase = next;
            seen.push(phase);
        }
        assert_eq!(
            seen,
            vec![
                StandardPhase::Instructions,
                StandardPhase::Practice,
                StandardPhase::Trials,
                StandardPhase::Descriptor,
                StandardPhase::Debrief
            ]
        );
        assert!(StandardPhase::Trials.is_trial());
        assert!(StandardPhase::Practice.is_practice());
        assert!(!StandardPhase::Debrief.is_trial());
    }
}
