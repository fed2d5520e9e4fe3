use std::collections::HashMap;

use serde::Serialize;

use super::inference::ModelOutput;

/// Label used when a request yields nothing usable.
pub const UNDETERMINED: &str = "판정 불가";
/// Label used when a detected class id has no entry in the name table.
pub const UNKNOWN: &str = "알 수 없음";

const FALLBACK_MESSAGE: &str = "감지된 정보가 명확하지 않습니다.";
const GRADE_MISSING_MESSAGE: &str = "등급 분류 결과를 찾을 수 없습니다.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisMode {
    Part,
    Grade,
}

/// A resolved label plus the human-readable sentence shown to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub label: String,
    pub message: String,
}

/// Turn a decoded model output into an `Insight`.
///
/// Degenerate outputs (no regions, mismatched variant, unresolvable class
/// id, missing name-map entry) never fail; they fall back to placeholder
/// text. `name_map` is only consulted in grade mode.
pub fn interpret(
    mode: AnalysisMode,
    output: &ModelOutput,
    name_map: Option<&HashMap<usize, String>>,
) -> Insight {
    match mode {
        AnalysisMode::Part => interpret_part(output),
        AnalysisMode::Grade => interpret_grade(output, name_map),
    }
}

fn interpret_part(output: &ModelOutput) -> Insight {
    let ModelOutput::Detections { regions, names } = output else {
        return fallback();
    };
    if regions.is_empty() {
        return fallback();
    }

    // Strictly-greater comparison: ties keep the first-seen region.
    let mut max_conf = 0.0f32;
    let mut label = UNDETERMINED.to_string();
    for region in regions {
        if region.score > max_conf {
            max_conf = region.score;
            label = names
                .get(&region.class_id)
                .cloned()
                .unwrap_or_else(|| UNKNOWN.to_string());
        }
    }

    let message = if label != UNDETERMINED && label != UNKNOWN {
        format!("부위 판정 {label}가 {max_conf:.2}의 확률로 감지되었습니다.")
    } else {
        FALLBACK_MESSAGE.to_string()
    };

    Insight { label, message }
}

fn interpret_grade(output: &ModelOutput, name_map: Option<&HashMap<usize, String>>) -> Insight {
    let ModelOutput::TopClass { index, confidence, .. } = output else {
        return Insight {
            label: UNDETERMINED.to_string(),
            message: GRADE_MISSING_MESSAGE.to_string(),
        };
    };

    // Grades are conventionally 1-indexed, so an unmapped index 0 renders
    // as "1".
    let label = name_map
        .and_then(|names| names.get(index))
        .cloned()
        .unwrap_or_else(|| (index + 1).to_string());

    let message = format!("등급 판정 {label}이 {confidence:.2} 확률로 감지되었습니다.");

    Insight { label, message }
}

fn fallback() -> Insight {
    Insight {
        label: UNDETERMINED.to_string(),
        message: FALLBACK_MESSAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::detection::Detection;

    fn region(class_id: usize, score: f32) -> Detection {
        Detection { x1: 0.0, y1: 0.0, x2: 10.0, y2: 10.0, score, class_id }
    }

    fn names(entries: &[(usize, &str)]) -> HashMap<usize, String> {
        entries.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn part_picks_highest_confidence_region() {
        let output = ModelOutput::Detections {
            regions: vec![region(0, 0.30), region(1, 0.82), region(2, 0.60)],
            names: names(&[(0, "chuck"), (1, "ribeye"), (2, "brisket")]),
        };
        let insight = interpret(AnalysisMode::Part, &output, None);
        assert_eq!(insight.label, "ribeye");
        assert!(insight.message.contains("ribeye"));
        assert!(insight.message.contains("0.82"));
    }

    #[test]
    fn part_tie_keeps_first_seen_region() {
        let output = ModelOutput::Detections {
            regions: vec![region(0, 0.70), region(1, 0.70)],
            names: names(&[(0, "chuck"), (1, "ribeye")]),
        };
        let insight = interpret(AnalysisMode::Part, &output, None);
        assert_eq!(insight.label, "chuck");
    }

    #[test]
    fn part_empty_detections_is_undetermined() {
        let output = ModelOutput::Detections { regions: vec![], names: HashMap::new() };
        let insight = interpret(AnalysisMode::Part, &output, None);
        assert_eq!(insight.label, UNDETERMINED);
        assert_eq!(insight.message, FALLBACK_MESSAGE);
    }

    #[test]
    fn part_unresolvable_class_keeps_fallback_message() {
        let output = ModelOutput::Detections {
            regions: vec![region(7, 0.91)],
            names: names(&[(0, "chuck")]),
        };
        let insight = interpret(AnalysisMode::Part, &output, None);
        assert_eq!(insight.label, UNKNOWN);
        assert_eq!(insight.message, FALLBACK_MESSAGE);
    }

    #[test]
    fn part_rejects_classification_output() {
        let output = ModelOutput::TopClass { index: 0, confidence: 0.9, names: None };
        let insight = interpret(AnalysisMode::Part, &output, None);
        assert_eq!(insight.label, UNDETERMINED);
        assert_eq!(insight.message, FALLBACK_MESSAGE);
    }

    #[test]
    fn part_formats_confidence_to_two_decimals() {
        let output = ModelOutput::Detections {
            regions: vec![region(0, 0.5)],
            names: names(&[(0, "ribeye")]),
        };
        let insight = interpret(AnalysisMode::Part, &output, None);
        assert!(insight.message.contains("0.50"));
    }

    #[test]
    fn grade_uses_name_map_when_index_present() {
        let output = ModelOutput::TopClass { index: 0, confidence: 0.77, names: None };
        let map = names(&[(0, "1++")]);
        let insight = interpret(AnalysisMode::Grade, &output, Some(&map));
        assert_eq!(insight.label, "1++");
        assert!(insight.message.contains("0.77"));
    }

    #[test]
    fn grade_falls_back_to_one_based_index() {
        let output = ModelOutput::TopClass { index: 2, confidence: 0.91, names: None };
        let insight = interpret(AnalysisMode::Grade, &output, None);
        assert_eq!(insight.label, "3");
    }

    #[test]
    fn grade_index_zero_renders_as_one() {
        let output = ModelOutput::TopClass { index: 0, confidence: 0.91, names: None };
        let insight = interpret(AnalysisMode::Grade, &output, None);
        assert_eq!(insight.label, "1");
    }

    #[test]
    fn grade_missing_map_entry_falls_back_to_index() {
        let output = ModelOutput::TopClass { index: 4, confidence: 0.42, names: None };
        let map = names(&[(0, "1++")]);
        let insight = interpret(AnalysisMode::Grade, &output, Some(&map));
        assert_eq!(insight.label, "5");
    }

    #[test]
    fn grade_rejects_detection_output() {
        let output = ModelOutput::Detections { regions: vec![], names: HashMap::new() };
        let insight = interpret(AnalysisMode::Grade, &output, None);
        assert_eq!(insight.label, UNDETERMINED);
        assert_eq!(insight.message, GRADE_MISSING_MESSAGE);
    }
}
