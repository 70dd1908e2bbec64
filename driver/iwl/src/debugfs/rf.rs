//! `rf/` 目录：校准开关

use alloc::vec;
use alloc::vec::Vec;

use dbgfs::{BoundedWriter, Capacity, CommandToken, DbgfsResult, Endpoint};

use super::DIR_RF;
use crate::device::IwlPriv;
use crate::ops::IwlOps;

pub(super) fn endpoints<O: IwlOps>() -> Vec<Endpoint<IwlPriv<O>>> {
    vec![
        Endpoint::read_write(
            DIR_RF,
            "disable_sensitivity",
            disable_sensitivity_read::<O>,
            disable_sensitivity_write::<O>,
            Capacity::Fixed(3),
        ),
        Endpoint::read_write(
            DIR_RF,
            "disable_chain_noise",
            disable_chain_noise_read::<O>,
            disable_chain_noise_write::<O>,
            Capacity::Fixed(3),
        ),
    ]
}

fn yes_no(w: &mut BoundedWriter, v: bool) {
    w.push_str(if v { "Y\n" } else { "N\n" });
}

fn disable_sensitivity_read<O: IwlOps>(p: &IwlPriv<O>, w: &mut BoundedWriter) -> DbgfsResult<()> {
    yes_no(w, p.disable_sens_cal);
    Ok(())
}

fn disable_sensitivity_write<O: IwlOps>(p: &mut IwlPriv<O>, t: &CommandToken<'_>) -> DbgfsResult<()> {
    p.disable_sens_cal = t.parse_bool()?;
    log::debug!(target: "wireless::iwl", "sensitivity calibration disabled: {}", p.disable_sens_cal);
    Ok(())
}

fn disable_chain_noise_read<O: IwlOps>(p: &IwlPriv<O>, w: &mut BoundedWriter) -> DbgfsResult<()> {
    yes_no(w, p.disable_chain_noise_cal);
    Ok(())
}

fn disable_chain_noise_write<O: IwlOps>(p: &mut IwlPriv<O>, t: &CommandToken<'_>) -> DbgfsResult<()> {
    p.disable_chain_noise_cal = t.parse_bool()?;
    log::debug!(target: "wireless::iwl", "chain noise calibration disabled: {}", p.disable_chain_noise_cal);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::testutil::{dev, read, write};
    use dbgfs::DbgfsError;

    #[test]
    fn calibration_switches() {
        let mut p = dev();
        assert_eq!(read(&p, "rf/disable_sensitivity").unwrap(), "N\n");
        write(&mut p, "rf/disable_sensitivity", "Y\n").unwrap();
        assert!(p.disable_sens_cal);
        assert_eq!(read(&p, "rf/disable_sensitivity").unwrap(), "Y\n");

        write(&mut p, "rf/disable_chain_noise", "1").unwrap();
        assert!(p.disable_chain_noise_cal);
        assert_eq!(write(&mut p, "rf/disable_chain_noise", "maybe"), Err(DbgfsError::ParseError));
        assert!(p.disable_chain_noise_cal);
        write(&mut p, "rf/disable_chain_noise", "off").unwrap();
        assert_eq!(read(&p, "rf/disable_chain_noise").unwrap(), "N\n");
    }
}
