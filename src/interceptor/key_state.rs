use crate::keys::TARGET_VK;
use crate::oskbd::KeyHost;

/// Whether the target key's toggle is currently on.
///
/// A failed query reads as "off". A wrong "off" only lets one press through unsuppressed, while a
/// wrong "on" would stop the interceptor from ever acting.
pub fn is_target_key_active<H: KeyHost + ?Sized>(host: &H) -> bool {
    match host.key_state(TARGET_VK) {
        Ok(state) => state & 1 != 0,
        Err(e) => {
            log::warn!("GetKeyState({TARGET_VK:#04x}) failed, assuming toggle is off: {e}");
            false
        }
    }
}
