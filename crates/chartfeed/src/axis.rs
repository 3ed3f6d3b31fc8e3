use serde::Deserialize;

// Two historical division heuristics survive in the dashboard; which one is
// canonical was never settled, so the policy stays pluggable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum AxisDivision {
    TenthOfMax,
    SteppedBlocks { step: usize, block: usize },
}

impl Default for AxisDivision {
    fn default() -> Self {
        AxisDivision::TenthOfMax
    }
}

impl AxisDivision {
    pub fn interval(&self, max_value: usize) -> usize {
        match self {
            AxisDivision::TenthOfMax => max_value.div_ceil(10).max(1),
            AxisDivision::SteppedBlocks { step, block } => {
                let blocks = if *block == 0 { 0 } else { max_value / block };
                (step * (blocks + 1)).max(1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenth_of_max_rounds_up() {
        let axis = AxisDivision::TenthOfMax;
        assert_eq!(axis.interval(0), 1);
        assert_eq!(axis.interval(5), 1);
        assert_eq!(axis.interval(10), 1);
        assert_eq!(axis.interval(11), 2);
        assert_eq!(axis.interval(95), 10);
        assert_eq!(axis.interval(100), 10);
    }

    #[test]
    fn test_stepped_blocks_grow_by_step_every_block() {
        let axis = AxisDivision::SteppedBlocks { step: 5, block: 30 };
        assert_eq!(axis.interval(0), 5);
        assert_eq!(axis.interval(29), 5);
        assert_eq!(axis.interval(30), 10);
        assert_eq!(axis.interval(90), 20);
    }

    #[test]
    fn test_interval_is_never_zero() {
        assert_eq!(AxisDivision::SteppedBlocks { step: 0, block: 30 }.interval(50), 1);
        assert_eq!(AxisDivision::SteppedBlocks { step: 5, block: 0 }.interval(50), 5);
    }
}
