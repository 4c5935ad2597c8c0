pub mod onoff;
pub mod standard;
pub mod switchcfg;

use std::fmt::Display;

/// The clusters this crate knows attribute names for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Cluster {
    OnOff,
    OnOffSwitchCfg,
}

impl Cluster {
    #[must_use]
    pub const fn id(self) -> u16 {
        match self {
            Self::OnOff => onoff::CLUSTER_ID,
            Self::OnOffSwitchCfg => switchcfg::CLUSTER_ID,
        }
    }

    /// Cluster name as used by zigbee-herdsman
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::OnOff => "genOnOff",
            Self::OnOffSwitchCfg => "genOnOffSwitchCfg",
        }
    }

    #[must_use]
    pub const fn from_id(id: u16) -> Option<Self> {
        match id {
            onoff::CLUSTER_ID => Some(Self::OnOff),
            switchcfg::CLUSTER_ID => Some(Self::OnOffSwitchCfg),
            _ => None,
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        [Self::OnOff, Self::OnOffSwitchCfg]
            .into_iter()
            .find(|cls| cls.name() == name)
    }

    const fn attributes(self) -> &'static [(u16, &'static str)] {
        match self {
            Self::OnOff => onoff::ATTRIBUTES,
            Self::OnOffSwitchCfg => switchcfg::ATTRIBUTES,
        }
    }

    /// Look up a standard attribute id by its symbolic name
    #[must_use]
    pub fn attribute_by_name(self, name: &str) -> Option<u16> {
        self.attributes()
            .iter()
            .find_map(|(id, n)| (*n == name).then_some(*id))
    }
}

impl Display for Cluster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
