use crate::error::RefError;
use crate::objmgr::{ObjRef, Psoc, RefId};

/// First management sequence number owned by the host. Firmware owns
/// everything below it.
pub const HOST_SEQ_NUM_MIN: u16 = 2048;
/// Last management sequence number owned by the host.
pub const HOST_SEQ_NUM_MAX: u16 = 4095;
/// Default HE SGI/LTF mask: let firmware pick automatically.
pub const DEF_HE_AUTO_SGI_LTF: u16 = 0x0080;

/// Operating mode of the driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverType {
    /// Normal mission mode.
    #[default]
    Production,
    /// Manufacturing / factory test mode. The protocol engine is not started.
    Mfg,
}

impl DriverType {
    pub fn is_mfg(self) -> bool {
        matches!(self, DriverType::Mfg)
    }
}

/// Opaque handle of the upper (OS interface) layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UpperHandle(pub usize);

/// Per-radio MAC state shared by the protocol engine and the configuration
/// store.
///
/// Field order matters: dropping the context releases the pdev reference
/// before the parent reference.
pub struct MacContext<P: Psoc> {
    pub(crate) upper: Option<UpperHandle>,
    pub(crate) driver_type: DriverType,
    pub(crate) mgmt_seq_num: u16,
    pub(crate) he_sgi_ltf_cfg_bit_mask: u16,
    pub(crate) is_usr_cfg_amsdu_enabled: bool,
    pub(crate) pdev: Option<ObjRef<P::Pdev>>,
    pub(crate) psoc: Option<ObjRef<P>>,
    pub(crate) mlme_cfg: Option<P::MlmeCfg>,
}

impl<P: Psoc> Default for MacContext<P> {
    fn default() -> Self {
        Self {
            upper: None,
            driver_type: DriverType::Production,
            mgmt_seq_num: 0,
            he_sgi_ltf_cfg_bit_mask: 0,
            is_usr_cfg_amsdu_enabled: false,
            pdev: None,
            psoc: None,
            mlme_cfg: None,
        }
    }
}

impl<P: Psoc> MacContext<P> {
    /// Set the fields that do not depend on any other subsystem.
    pub(crate) fn init_defaults(
        &mut self,
        upper: UpperHandle,
        driver_type: DriverType,
    ) {
        self.upper = Some(upper);
        // Reset again by `start`.
        self.driver_type = driver_type;
        self.mgmt_seq_num = HOST_SEQ_NUM_MIN - 1;
        self.he_sgi_ltf_cfg_bit_mask = DEF_HE_AUTO_SGI_LTF;
        self.is_usr_cfg_amsdu_enabled = true;
    }

    pub fn upper(&self) -> Option<UpperHandle> {
        self.upper
    }

    pub fn driver_type(&self) -> DriverType {
        self.driver_type
    }

    /// Last management sequence number handed out.
    pub fn mgmt_seq_num(&self) -> u16 {
        self.mgmt_seq_num
    }

    /// Allocate the next host-owned management sequence number.
    ///
    /// Wraps from [`HOST_SEQ_NUM_MAX`] back to [`HOST_SEQ_NUM_MIN`]; never
    /// returns a firmware-owned number.
    pub fn next_mgmt_seq_num(&mut self) -> u16 {
        self.mgmt_seq_num = if (HOST_SEQ_NUM_MIN..HOST_SEQ_NUM_MAX)
            .contains(&self.mgmt_seq_num)
        {
            self.mgmt_seq_num + 1
        } else {
            HOST_SEQ_NUM_MIN
        };
        self.mgmt_seq_num
    }

    pub fn he_sgi_ltf_cfg_bit_mask(&self) -> u16 {
        self.he_sgi_ltf_cfg_bit_mask
    }

    pub fn set_he_sgi_ltf_cfg_bit_mask(&mut self, mask: u16) {
        self.he_sgi_ltf_cfg_bit_mask = mask;
    }

    pub fn is_usr_cfg_amsdu_enabled(&self) -> bool {
        self.is_usr_cfg_amsdu_enabled
    }

    pub fn set_usr_cfg_amsdu_enabled(&mut self, enabled: bool) {
        self.is_usr_cfg_amsdu_enabled = enabled;
    }

    /// Parent back-reference, present while the parent reference is held.
    pub fn psoc(&self) -> Option<&P> {
        self.psoc.as_deref()
    }

    /// Configuration view, present while the configuration store is up.
    pub fn mlme_cfg(&self) -> Option<&P::MlmeCfg> {
        self.mlme_cfg.as_ref()
    }

    pub fn pdev(&self) -> Option<&P::Pdev> {
        self.pdev.as_deref()
    }

    /// Take a counted reference on `pdev` and keep it until close.
    ///
    /// A previously attached pdev is released first.
    pub fn attach_pdev(&mut self, pdev: P::Pdev) -> Result<(), RefError> {
        self.detach_pdev();
        self.pdev = Some(ObjRef::acquire(pdev, RefId::LEGACY_MAC)?);
        Ok(())
    }

    /// Release the pdev reference, if any. Returns whether one was held.
    pub fn detach_pdev(&mut self) -> bool {
        match self.pdev.take() {
            Some(pdev) => {
                pdev.release();
                true
            }
            None => false,
        }
    }
}
