//! On/off switch configuration cluster (0x0007)

pub const CLUSTER_ID: u16 = 0x0007;

pub const ATTR_SWITCH_TYPE: u16 = 0x0000;
pub const ATTR_SWITCH_ACTIONS: u16 = 0x0010;

pub const ATTRIBUTES: &[(u16, &str)] = &[
    (ATTR_SWITCH_TYPE, "switchType"),
    (ATTR_SWITCH_ACTIONS, "switchActions"),
];
