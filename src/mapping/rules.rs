use crate::domain::FieldTag;

/// One heuristic: if the lowercased header contains any keyword, it gets the tag.
pub struct MappingRule {
    pub tag: FieldTag,
    pub keywords: &'static [&'static str],
}

/// Ordered, case-insensitive substring rules. Evaluated top to bottom; the
/// first hit wins, so RANK keywords shadow everything below. Headers matching
/// nothing are proposed as IGNORE and left for the human to re-tag.
pub const RULES: &[MappingRule] = &[
    MappingRule {
        tag: FieldTag::Rank,
        keywords: &["rank", "pos", "place", "finish"],
    },
    MappingRule {
        tag: FieldTag::Name,
        keywords: &["name", "rider", "skater", "competitor", "athlete", "racer"],
    },
    MappingRule {
        tag: FieldTag::Points,
        keywords: &["point", "pts", "score"],
    },
    MappingRule {
        tag: FieldTag::Discipline,
        keywords: &[
            "discipline",
            "category",
            "division",
            "class",
            "luge",
            "street",
            "downhill",
        ],
    },
    MappingRule {
        tag: FieldTag::Event,
        keywords: &["event", "race", "round"],
    },
    MappingRule {
        tag: FieldTag::Time,
        keywords: &["time", "duration"],
    },
    MappingRule {
        tag: FieldTag::Country,
        keywords: &["country", "nation"],
    },
];

/// Deterministic tag suggestion for a single raw header.
pub fn suggest_tag(header: &str) -> FieldTag {
    let lower = header.trim().to_lowercase();
    for rule in RULES {
        if rule.keywords.iter().any(|keyword| lower.contains(keyword)) {
            return rule.tag;
        }
    }
    FieldTag::Ignore
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_headers_are_recognized() {
        assert_eq!(suggest_tag("Pos"), FieldTag::Rank);
        assert_eq!(suggest_tag("Ranking"), FieldTag::Rank);
        assert_eq!(suggest_tag("Rider"), FieldTag::Name);
        assert_eq!(suggest_tag("Full Name"), FieldTag::Name);
        assert_eq!(suggest_tag("Pts"), FieldTag::Points);
        assert_eq!(suggest_tag("Category"), FieldTag::Discipline);
        assert_eq!(suggest_tag("Country"), FieldTag::Country);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(suggest_tag("POSITION"), FieldTag::Rank);
        assert_eq!(suggest_tag("points"), FieldTag::Points);
    }

    #[test]
    fn rank_rule_shadows_later_rules() {
        // "Finish Time" contains both "finish" and "time"; order decides.
        assert_eq!(suggest_tag("Finish Time"), FieldTag::Rank);
    }

    #[test]
    fn unknown_headers_fall_back_to_ignore() {
        assert_eq!(suggest_tag("Sponsor"), FieldTag::Ignore);
        assert_eq!(suggest_tag(""), FieldTag::Ignore);
    }
}
