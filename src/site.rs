//! Static product content: landing page, pricing tiers, FAQ and documentation index.

pub const HERO_TITLE: &str = "Unleash Your Social Media Potential";
pub const HERO_TAGLINE: &str =
    "Harness the power of AI to dominate Twitter, Instagram, and LinkedIn with captivating content.";
pub const HERO_CALL_TO_ACTION: &str = "Get Started Now";

pub struct Feature {
    pub title: &'static str,
    pub description: &'static str,
    pub link: &'static str,
}

pub const FEATURES: &[Feature] = &[
    Feature {
        title: "Smart Automation",
        description: "Automate your social media workflow with AI-powered scheduling and content generation.",
        link: "/features/automation",
    },
    Feature {
        title: "Content Generation",
        description: "Create engaging posts that resonate with your audience across all platforms.",
        link: "/features/content-generation",
    },
    Feature {
        title: "Growth Analytics",
        description: "Track your social media performance with detailed insights and metrics.",
        link: "/features/analytics",
    },
    Feature {
        title: "Smart Scheduling",
        description: "Post at the perfect time with AI-optimized scheduling for maximum engagement.",
        link: "/features/scheduling",
    },
    Feature {
        title: "Audience Insights",
        description: "Understand your followers better with detailed demographic analysis.",
        link: "/features/audience-insights",
    },
    Feature {
        title: "Performance Tracking",
        description: "Monitor your growth and engagement with real-time analytics dashboard.",
        link: "/features/performance",
    },
];

pub struct PlanFeature {
    pub included: bool,
    pub text: &'static str,
}

pub struct Plan {
    pub name: &'static str,
    pub for_who: &'static str,
    pub price_usd: u32,
    pub description: &'static str,
    pub popular: bool,
    pub features: &'static [PlanFeature],
}

const fn feature(included: bool, text: &'static str) -> PlanFeature {
    PlanFeature { included, text }
}

pub const PLANS: &[Plan] = &[
    Plan {
        name: "Basic",
        for_who: "For individuals",
        price_usd: 39,
        description: "Perfect for smaller projects",
        popular: false,
        features: &[
            feature(true, "250 lead credits / mo"),
            feature(true, "Supports Twitter/X"),
            feature(true, "Realtime Notifications"),
            feature(true, "AI Replies"),
            feature(true, "Basic Analytics"),
            feature(false, "Supports Reddit"),
            feature(false, "Supports LinkedIn"),
            feature(false, "Automated follow-up"),
        ],
    },
    Plan {
        name: "Launch",
        for_who: "For startups/agencies",
        price_usd: 79,
        description: "Perfect for growth-stage companies",
        popular: true,
        features: &[
            feature(true, "1000 lead credits / mo"),
            feature(true, "Supports Twitter/X"),
            feature(true, "Realtime Notifications"),
            feature(true, "AI Replies"),
            feature(true, "Basic Analytics"),
            feature(true, "Supports Reddit"),
            feature(false, "Supports LinkedIn"),
            feature(false, "Automated follow-up"),
        ],
    },
    Plan {
        name: "Scale",
        for_who: "For enterprises",
        price_usd: 299,
        description: "For larger scale companies",
        popular: false,
        features: &[
            feature(true, "5000 lead credits / mo"),
            feature(true, "Supports Twitter/X"),
            feature(true, "Realtime Notifications"),
            feature(true, "AI Replies"),
            feature(true, "Advanced Analytics"),
            feature(true, "Supports Reddit"),
            feature(true, "Supports LinkedIn"),
            feature(true, "Automated follow-up"),
        ],
    },
];

pub struct Faq {
    pub question: &'static str,
    pub answer: &'static str,
}

pub const FAQS: &[Faq] = &[
    Faq {
        question: "What do I get with our Social Media AI platform?",
        answer: "Our Social Media AI platform provides you with a comprehensive set of tools and features to enhance your social media presence and engagement.",
    },
    Faq {
        question: "What makes our Social Media AI unique?",
        answer: "Our unique approach combines cutting-edge AI technology with intuitive design, making social media management faster and more efficient.",
    },
    Faq {
        question: "What is the main goal of our Social Media AI?",
        answer: "Our main goal is to simplify complex social media processes while maintaining flexibility and power for advanced users and marketers.",
    },
    Faq {
        question: "How often is our Social Media AI platform updated?",
        answer: "We release updates regularly, typically every two weeks, with major feature releases every quarter to keep up with the latest social media trends.",
    },
    Faq {
        question: "What features does our Social Media AI platform have?",
        answer: "Our platform includes AI-powered content generation, automated posting schedules, advanced analytics, multi-platform management, and comprehensive reporting tools.",
    },
    Faq {
        question: "Is our Social Media AI platform easy to use?",
        answer: "Yes! We've designed our platform to be intuitive for beginners while providing advanced features for experienced social media managers.",
    },
    Faq {
        question: "What technology does our Social Media AI use?",
        answer: "We use the latest AI and machine learning technologies, along with robust cloud infrastructure, to ensure optimal performance and reliability.",
    },
    Faq {
        question: "Can I get a refund if I'm not happy with the Social Media AI platform?",
        answer: "Yes, we offer a 30-day money-back guarantee with no questions asked to ensure your satisfaction.",
    },
    Faq {
        question: "What support do you offer?",
        answer: "We provide 24/7 email support, comprehensive documentation, video tutorials, and an active community forum for all our users.",
    },
];

pub struct DocSection {
    pub title: &'static str,
    pub description: &'static str,
    pub link: &'static str,
}

pub const DOC_SECTIONS: &[DocSection] = &[
    DocSection {
        title: "Getting Started",
        description: "Learn how to set up your account and create your first AI-generated content.",
        link: "/docs/getting-started",
    },
    DocSection {
        title: "Twitter Threads",
        description: "Discover how to create engaging Twitter threads using our AI technology.",
        link: "/docs/twitter-threads",
    },
    DocSection {
        title: "Instagram Captions",
        description: "Learn the best practices for generating Instagram captions that boost engagement.",
        link: "/docs/instagram-captions",
    },
    DocSection {
        title: "LinkedIn Posts",
        description: "Explore techniques for crafting professional LinkedIn content with AI assistance.",
        link: "/docs/linkedin-posts",
    },
    DocSection {
        title: "API Reference",
        description: "Detailed documentation for integrating our AI content generation into your applications.",
        link: "/docs/api-reference",
    },
];

pub const NO_DOC_RESULTS: &str = "No results found. Please try a different search term.";

pub const FOOTER_LINKS: &[(&str, &[&str])] = &[
    ("Product", &["Features", "Pricing", "About Us", "Contact"]),
    ("Legal", &["Terms of Service", "Privacy Policy", "Cookie Policy"]),
];

/// Doc sections whose title or description contains `term`, case-insensitively.
pub fn search_docs(term: &str) -> Vec<&'static DocSection> {
    let needle = term.trim().to_lowercase();
    DOC_SECTIONS
        .iter()
        .filter(|s| {
            needle.is_empty()
                || s.title.to_lowercase().contains(&needle)
                || s.description.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Hero banner followed by the feature grid.
pub fn home_lines() -> Vec<String> {
    let mut lines = vec![
        HERO_TITLE.to_string(),
        HERO_TAGLINE.to_string(),
        String::new(),
        format!("> {HERO_CALL_TO_ACTION} (threadcraft --sign-in <USER>)"),
        String::new(),
        "Our Features".to_string(),
    ];
    for f in FEATURES {
        lines.push(String::new());
        lines.push(format!("{}  ({})", f.title, f.link));
        lines.push(format!("  {}", f.description));
    }
    lines
}

pub fn pricing_lines() -> Vec<String> {
    let mut lines = vec!["Simple, scalable pricing".to_string()];
    for plan in PLANS {
        lines.push(String::new());
        let badge = if plan.popular { "  (most popular)" } else { "" };
        lines.push(format!(
            "{}: ${}/mo  {}{}",
            plan.name, plan.price_usd, plan.for_who, badge
        ));
        lines.push(format!("  {}", plan.description));
        for f in plan.features {
            let mark = if f.included { "✓" } else { "✗" };
            lines.push(format!("  {mark} {}", f.text));
        }
    }
    lines
}

pub fn faq_lines() -> Vec<String> {
    let mut lines = vec!["Frequently asked questions".to_string()];
    for faq in FAQS {
        lines.push(String::new());
        lines.push(format!("Q: {}", faq.question));
        lines.push(format!("A: {}", faq.answer));
    }
    lines
}

pub fn docs_lines(term: &str) -> Vec<String> {
    let found = search_docs(term);
    if found.is_empty() {
        return vec![NO_DOC_RESULTS.to_string()];
    }
    let mut lines = Vec::new();
    for (i, s) in found.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(format!("{}  ({})", s.title, s.link));
        lines.push(format!("  {}", s.description));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_search_returns_everything() {
        assert_eq!(search_docs("").len(), DOC_SECTIONS.len());
        assert_eq!(search_docs("   ").len(), DOC_SECTIONS.len());
    }

    #[test]
    fn search_matches_title_or_description_case_insensitively() {
        let titles: Vec<_> = search_docs("TWITTER").iter().map(|s| s.title).collect();
        assert_eq!(titles, vec!["Twitter Threads"]);

        let titles: Vec<_> = search_docs("engagement").iter().map(|s| s.title).collect();
        assert_eq!(titles, vec!["Instagram Captions"]);
    }

    #[test]
    fn no_match_renders_hint() {
        assert_eq!(docs_lines("zzz"), vec![NO_DOC_RESULTS.to_string()]);
    }

    #[test]
    fn home_page_has_hero_and_six_features() {
        let lines = home_lines();
        assert_eq!(lines[0], HERO_TITLE);
        assert!(lines.iter().any(|l| l.contains("Get Started Now")));
        assert_eq!(FEATURES.len(), 6);
        for f in FEATURES {
            assert!(lines.iter().any(|l| l.starts_with(f.title)));
        }
    }

    #[test]
    fn exactly_one_popular_plan() {
        assert_eq!(PLANS.iter().filter(|p| p.popular).count(), 1);
        assert!(pricing_lines().iter().any(|l| l.contains("Launch") && l.contains("most popular")));
    }
}
