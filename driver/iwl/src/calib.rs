//! 灵敏度与链路噪声校准状态

pub const NUM_RX_CHAINS: usize = 3;
pub const NRG_NUM_PREV_STAT_L: usize = 20;
pub const NRG_VALUE_NUM: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SensitivityData {
    pub auto_corr_ofdm: u32,
    pub auto_corr_ofdm_mrc: u32,
    pub auto_corr_ofdm_x1: u32,
    pub auto_corr_ofdm_mrc_x1: u32,
    pub auto_corr_cck: u32,
    pub auto_corr_cck_mrc: u32,
    pub last_bad_plcp_cnt_ofdm: u32,
    pub last_fa_cnt_ofdm: u32,
    pub last_bad_plcp_cnt_cck: u32,
    pub last_fa_cnt_cck: u32,
    pub nrg_curr_state: u32,
    pub nrg_prev_state: u32,
    pub nrg_value: [u32; NRG_VALUE_NUM],
    pub nrg_silence_rssi: [u8; NRG_NUM_PREV_STAT_L],
    pub nrg_silence_ref: u32,
    pub nrg_energy_idx: u32,
    pub nrg_silence_idx: u32,
    pub nrg_th_cck: u32,
    pub nrg_auto_corr_silence_diff: i32,
    pub num_in_cck_no_fa: u32,
    pub nrg_th_ofdm: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChainNoiseData {
    pub active_chains: u32,
    pub chain_noise_a: u32,
    pub chain_noise_b: u32,
    pub chain_noise_c: u32,
    pub chain_signal_a: u32,
    pub chain_signal_b: u32,
    pub chain_signal_c: u32,
    pub beacon_count: u16,
    pub disconn_array: [u8; NUM_RX_CHAINS],
    pub delta_gain_code: [u8; NUM_RX_CHAINS],
    pub radio_write: u8,
    pub state: u8,
}
