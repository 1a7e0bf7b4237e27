//! Keyword-matched focus area templates used when the oracle cannot expand a query.

use crate::types::{FocusArea, FocusCategory};

struct Template {
    title: &'static str,
    description: &'static str,
    /// `{q}` is replaced with the user's query.
    query: &'static str,
    category: FocusCategory,
}

const SALES_KEYWORDS: &[&str] = &[
    "sales",
    "selling",
    "marketing",
    "leads",
    "lead",
    "crm",
    "outreach",
    "prospecting",
    "funnel",
    "conversion",
    "conversions",
    "advertising",
    "ads",
    "seo",
    "b2b",
    "cold",
];

const PLANT_KEYWORDS: &[&str] = &[
    "plant",
    "plants",
    "houseplant",
    "houseplants",
    "garden",
    "gardening",
    "succulent",
    "succulents",
    "watering",
    "soil",
    "fertilizer",
    "pruning",
    "repotting",
];

const SALES_TEMPLATES: &[Template] = &[
    Template {
        title: "Sales Challenges",
        description: "Obstacles people hit when closing deals and hitting quota",
        query: "{q} challenges struggling to close",
        category: FocusCategory::Problems,
    },
    Template {
        title: "Campaign Stories",
        description: "First-hand accounts of campaigns and outreach that were tried",
        query: "{q} what happened when we tried",
        category: FocusCategory::Experiences,
    },
    Template {
        title: "Strategy Questions",
        description: "Questions people ask about improving their pipeline",
        query: "{q} how do I get more",
        category: FocusCategory::Questions,
    },
    Template {
        title: "Growth Wins",
        description: "Results and numbers people share after something worked",
        query: "{q} results doubled revenue",
        category: FocusCategory::Success,
    },
    Template {
        title: "Sales Tools",
        description: "Software and platforms recommended for the job",
        query: "{q} best tools software",
        category: FocusCategory::Tools,
    },
    Template {
        title: "Market Trends",
        description: "Shifts in buyer behavior and channels people are noticing",
        query: "{q} trends this year",
        category: FocusCategory::Trends,
    },
];

const PLANT_TEMPLATES: &[Template] = &[
    Template {
        title: "Plant Problems",
        description: "Yellowing leaves, pests, rot and other care problems",
        query: "{q} dying help yellow leaves",
        category: FocusCategory::Problems,
    },
    Template {
        title: "Care Routines",
        description: "How growers water, feed and place their plants",
        query: "{q} my care routine",
        category: FocusCategory::Experiences,
    },
    Template {
        title: "Beginner Questions",
        description: "Questions new plant owners ask",
        query: "{q} beginner question how often",
        category: FocusCategory::Questions,
    },
    Template {
        title: "Growth Progress",
        description: "Progress photos and recoveries people are proud of",
        query: "{q} progress update thriving",
        category: FocusCategory::Success,
    },
    Template {
        title: "Gear and Supplies",
        description: "Pots, soil mixes, lights and tools people recommend",
        query: "{q} best soil pots grow light",
        category: FocusCategory::Tools,
    },
];

const GENERIC_TEMPLATES: &[Template] = &[
    Template {
        title: "Common Problems",
        description: "Frustrations and problems people report",
        query: "{q} problems frustrating",
        category: FocusCategory::Problems,
    },
    Template {
        title: "Personal Experiences",
        description: "First-hand stories and reviews",
        query: "{q} my experience review",
        category: FocusCategory::Experiences,
    },
    Template {
        title: "Frequent Questions",
        description: "What people want to know before they start",
        query: "{q} questions how to",
        category: FocusCategory::Questions,
    },
    Template {
        title: "Success Stories",
        description: "Outcomes people are happy with",
        query: "{q} success worked for me",
        category: FocusCategory::Success,
    },
    Template {
        title: "Tools and Resources",
        description: "Products, apps and resources people recommend",
        query: "{q} recommendations tools",
        category: FocusCategory::Tools,
    },
    Template {
        title: "Emerging Trends",
        description: "New directions and rising topics",
        query: "{q} new trend",
        category: FocusCategory::Trends,
    },
];

/// Deterministic focus areas for `query`, picked by keyword.
///
/// Sales and marketing queries get six entries, plant care queries five,
/// anything else the six generic ones. Every entry has `is_fallback` set.
/// The custom slot is not included.
#[must_use]
pub fn fallback_focus_areas(query: &str) -> Vec<FocusArea> {
    let q = query.trim();
    template_bank(q)
        .iter()
        .map(|t| FocusArea {
            title: t.title.to_string(),
            description: t.description.to_string(),
            expanded_query: t.query.replace("{q}", q).trim().to_string(),
            category: t.category,
            is_custom: false,
            is_fallback: true,
        })
        .collect()
}

fn template_bank(query: &str) -> &'static [Template] {
    let lower = query.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let mentions = |keywords: &[&str]| words.iter().any(|w| keywords.contains(w));

    if mentions(SALES_KEYWORDS) {
        SALES_TEMPLATES
    } else if mentions(PLANT_KEYWORDS) {
        PLANT_TEMPLATES
    } else {
        GENERIC_TEMPLATES
    }
}
