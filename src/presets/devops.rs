use crate::core::score::Question;
use crate::presets::Preset;

pub struct DevopsPreset;

struct Area {
    category: &'static str,
    indicators: &'static [(&'static str, &'static str)],
}

// Organizational Adoption domain. Every indicator weighs the same.
static AREAS: [Area; 3] = [
    Area {
        category: "organizational_adoption.leader_sponsorship",
        indicators: &[
            (
                "OA.LS.1",
                "Appoint a decision-making leader to own DevOps adoption",
            ),
            ("OA.LS.2", "Align DevOps adoption with business objectives"),
            (
                "OA.LS.3",
                "Drive continued improvement through business reviews",
            ),
            ("OA.LS.4", "Open dialogue between leadership and teams"),
            (
                "OA.LS.5",
                "Assemble a cross-functional enabling team that focuses on organizational transformation",
            ),
        ],
    },
    Area {
        category: "organizational_adoption.supportive_team_dynamics",
        indicators: &[
            (
                "OA.STD.1",
                "Organize teams into distinct topology types to optimize the value stream",
            ),
            (
                "OA.STD.2",
                "Tailor operating models to business needs and team preferences",
            ),
            (
                "OA.STD.3",
                "Prioritize shared accountability over individual achievements",
            ),
            (
                "OA.STD.4",
                "Structure teams around desired business outcomes",
            ),
            (
                "OA.STD.5",
                "Establish team norms that enhance work performance",
            ),
            (
                "OA.STD.6",
                "Provide teams ownership of the entire value stream for their product",
            ),
            (
                "OA.STD.7",
                "Amplify the scale and impact of centralized functions",
            ),
            ("OA.STD.8", "Promote cognitive diversity within teams"),
        ],
    },
    Area {
        category: "organizational_adoption.team_interfaces",
        indicators: &[
            (
                "OA.TI.1",
                "Communicate work flow and goals between teams and stakeholders",
            ),
            (
                "OA.TI.2",
                "Streamline intra-team communication using tools and processes",
            ),
            (
                "OA.TI.3",
                "Establish mechanisms for teams to gather and manage customer feedback",
            ),
            ("OA.TI.4", "Refine error tracking and resolution"),
            (
                "OA.TI.5",
                "Design adaptive approval workflows without compromising safety",
            ),
            (
                "OA.TI.6",
                "Prioritize customer needs to deliver optimal business outcomes",
            ),
            ("OA.TI.7", "Maintain a unified knowledge source for teams"),
            ("OA.TI.8", "Simplify access to organizational information"),
            (
                "OA.TI.9",
                "Facilitate self-service collaboration through APIs and documentation",
            ),
            (
                "OA.TI.10",
                "Choose interaction modes for improved efficiency and cost savings",
            ),
            (
                "OA.TI.11",
                "Offer optional opportunities for cross-team collaboration",
            ),
        ],
    },
];

impl Preset for DevopsPreset {
    fn name(&self) -> &'static str {
        "devops"
    }

    fn title(&self) -> &'static str {
        "DevOps Maturity Assessment"
    }

    fn questions(&self) -> Vec<Question> {
        AREAS
            .iter()
            .flat_map(|area| {
                area.indicators
                    .iter()
                    .map(move |(id, text)| Question::new(*text, 1.0, area.category).with_id(*id))
            })
            .collect()
    }
}
