#[cfg(test)]
#[path = "starters_test.rs"]
mod tests;

/// A landing page group of ready made prompts.
pub struct StarterCategory {
    pub title: &'static str,
    pub description: &'static str,
    pub prompts: &'static [&'static str],
}

pub const STARTER_CATEGORIES: &[StarterCategory] = &[
    StarterCategory {
        title: "Viral Content Ideas",
        description: "Get AI-powered suggestions for your next viral post",
        prompts: &[
            "Generate 5 viral Instagram Reel ideas for a fitness coach targeting busy professionals",
            "Create trending TikTok content ideas for a small bakery business",
            "Suggest engaging LinkedIn posts for a tech startup founder",
            "What are some viral content formats I should try this month?",
        ],
    },
    StarterCategory {
        title: "Smart Hashtags & SEO",
        description: "Discover trending hashtags and optimize your reach",
        prompts: &[
            "Find the best hashtags for my sustainable fashion brand on Instagram",
            "What hashtags are trending in the digital marketing space right now?",
            "Help me create a hashtag strategy for my food blog",
            "Suggest location-based hashtags for my local coffee shop",
        ],
    },
    StarterCategory {
        title: "Content Calendar & Planning",
        description: "Strategic planning for consistent social media presence",
        prompts: &[
            "Create a 30-day content calendar for my wellness coaching business",
            "Plan a holiday season social media strategy for an e-commerce store",
            "What's the best posting schedule for maximum engagement?",
            "Help me plan content around upcoming industry events",
        ],
    },
    StarterCategory {
        title: "Analytics & Growth",
        description: "Optimize performance and accelerate your growth",
        prompts: &[
            "How can I improve my Instagram engagement rate?",
            "What metrics should I track for my LinkedIn business page?",
            "Analyze why my recent posts aren't performing well",
            "Create a strategy to gain 1000 followers this month",
        ],
    },
    StarterCategory {
        title: "Quick Actions",
        description: "Ad campaigns, trending topics and community building",
        prompts: &[
            "Help me create a high-converting Facebook ad campaign for my new product launch",
            "What are the hottest social media trends I should jump on right now?",
            "How can I build an engaged community around my brand on social media?",
        ],
    },
];

/// Looks up a prompt by its 1-based position across all categories, the same
/// numbering the landing page shows.
pub fn starter_prompt(number: usize) -> Option<&'static str> {
    return STARTER_CATEGORIES
        .iter()
        .flat_map(|category| return category.prompts.iter())
        .nth(number.checked_sub(1)?)
        .copied();
}
