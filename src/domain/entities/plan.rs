use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum PlanInterval {
    Month,
    Year,
}

/// A purchasable plan as offered on the plans page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plan {
    /// Stable code used in routes and actions (e.g. `subscribe:annual`).
    pub code: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub price: &'static str,
    pub interval: PlanInterval,
    pub features: &'static [&'static str],
    /// Payments-provider price id, matched against `SubscriptionStatus::plan_id`.
    pub price_id: &'static str,
    pub best_value: bool,
}

pub const PLANS: [Plan; 2] = [
    Plan {
        code: "monthly",
        name: "Monthly Plan",
        description: "Perfect for individuals",
        price: "$9.99",
        interval: PlanInterval::Month,
        features: &[
            "Full access to all features",
            "Priority support",
            "Regular updates",
            "Cancel anytime",
        ],
        price_id: "price_monthly",
        best_value: false,
    },
    Plan {
        code: "annual",
        name: "Annual Plan",
        description: "Best value for committed users",
        price: "$99.99",
        interval: PlanInterval::Year,
        features: &[
            "Everything in Monthly Plan",
            "2 months free",
            "Premium support",
            "Early access to new features",
        ],
        price_id: "price_annual",
        best_value: true,
    },
];

pub fn find_plan(code: &str) -> Option<&'static Plan> {
    PLANS.iter().find(|plan| plan.code == code)
}
