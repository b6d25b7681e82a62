use serde::{Deserialize, Serialize};

/// A simulated ride-hailing brand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    Uber,
    Bolt,
    Freenow,
    Heetch,
}

impl Provider {
    pub const ALL: [Provider; 4] = [
        Provider::Uber,
        Provider::Bolt,
        Provider::Freenow,
        Provider::Heetch,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Uber => "uber",
            Self::Bolt => "bolt",
            Self::Freenow => "freenow",
            Self::Heetch => "heetch",
        }
    }
}

#[test]
fn provider_names_match_wire_format() {
    for provider in Provider::ALL {
        let wire = serde_json::to_value(provider).unwrap();
        assert_eq!(wire, serde_json::json!(provider.name()));
    }
}
