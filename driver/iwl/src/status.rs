//! 驱动状态位

pub const STATUS_HCMD_ACTIVE: u32 = 0;
pub const STATUS_INT_ENABLED: u32 = 2;
pub const STATUS_RF_KILL_HW: u32 = 3;
pub const STATUS_CT_KILL: u32 = 4;
pub const STATUS_INIT: u32 = 5;
pub const STATUS_ALIVE: u32 = 6;
pub const STATUS_READY: u32 = 7;
pub const STATUS_TEMPERATURE: u32 = 8;
pub const STATUS_GEO_CONFIGURED: u32 = 9;
pub const STATUS_EXIT_PENDING: u32 = 10;
pub const STATUS_STATISTICS: u32 = 12;
pub const STATUS_SCANNING: u32 = 13;
pub const STATUS_SCAN_ABORTING: u32 = 14;
pub const STATUS_SCAN_HW: u32 = 15;
pub const STATUS_POWER_PMI: u32 = 16;
pub const STATUS_FW_ERROR: u32 = 17;

/// 状态报告的行序与标签（标签已含对齐用的制表符）
pub const STATUS_LABELS: [(u32, &str); 16] = [
    (STATUS_HCMD_ACTIVE, "STATUS_HCMD_ACTIVE:\t"),
    (STATUS_INT_ENABLED, "STATUS_INT_ENABLED:\t"),
    (STATUS_RF_KILL_HW, "STATUS_RF_KILL_HW:\t"),
    (STATUS_CT_KILL, "STATUS_CT_KILL:\t\t"),
    (STATUS_INIT, "STATUS_INIT:\t\t"),
    (STATUS_ALIVE, "STATUS_ALIVE:\t\t"),
    (STATUS_READY, "STATUS_READY:\t\t"),
    (STATUS_TEMPERATURE, "STATUS_TEMPERATURE:\t"),
    (STATUS_GEO_CONFIGURED, "STATUS_GEO_CONFIGURED:\t"),
    (STATUS_EXIT_PENDING, "STATUS_EXIT_PENDING:\t"),
    (STATUS_STATISTICS, "STATUS_STATISTICS:\t"),
    (STATUS_SCANNING, "STATUS_SCANNING:\t"),
    (STATUS_SCAN_ABORTING, "STATUS_SCAN_ABORTING:\t"),
    (STATUS_SCAN_HW, "STATUS_SCAN_HW:\t\t"),
    (STATUS_POWER_PMI, "STATUS_POWER_PMI:\t"),
    (STATUS_FW_ERROR, "STATUS_FW_ERROR:\t"),
];

/// 状态位集合
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Status(u32);

impl Status {
    #[inline]
    pub fn test(self, bit: u32) -> bool {
        self.0 & (1 << bit) != 0
    }

    #[inline]
    pub fn set(&mut self, bit: u32) {
        self.0 |= 1 << bit;
    }

    #[inline]
    pub fn clear(&mut self, bit: u32) {
        self.0 &= !(1 << bit);
    }

    #[inline]
    pub fn bits(self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_clear() {
        let mut s = Status::default();
        s.set(STATUS_READY);
        s.set(STATUS_FW_ERROR);
        assert!(s.test(STATUS_READY));
        assert_eq!(s.bits(), (1 << 7) | (1 << 17));
        s.clear(STATUS_READY);
        assert!(!s.test(STATUS_READY));
    }
}
