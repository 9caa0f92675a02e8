use std::sync::OnceLock;

use tracing::{debug, instrument, trace};

use crate::sound;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Not asked yet
    Default,
    Granted,
    Denied,
    Unsupported,
}

/// Something that can put a title and a body in front of the user.
///
/// Implementors provide [`Notifier::permission`] and [`Notifier::deliver`]; callers go through
/// [`Notifier::send`], which drops the notification unless permission was granted.
pub trait Notifier: Send + Sync {
    /// Asks for permission once. Later calls return the first answer.
    fn request_permission(&self) -> Permission;

    fn permission(&self) -> Permission;

    fn deliver(&self, title: &str, body: &str);

    fn send(&self, title: &str, body: &str) {
        if self.permission() == Permission::Granted {
            self.deliver(title, body);
        } else {
            trace!("Notification skipped ({:?}): {title}", self.permission());
        }
    }
}

/// Native notification plus the reminder tone.
#[derive(Debug, Default)]
pub struct DesktopNotifier {
    enabled: bool,
    permission: OnceLock<Permission>,
}

impl DesktopNotifier {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            permission: OnceLock::new(),
        }
    }
}

impl Notifier for DesktopNotifier {
    fn request_permission(&self) -> Permission {
        *self.permission.get_or_init(|| {
            let permission = if self.enabled {
                Permission::Granted
            } else {
                Permission::Denied
            };
            debug!("Notification permission: {permission:?}");
            permission
        })
    }

    fn permission(&self) -> Permission {
        self.permission.get().copied().unwrap_or(Permission::Default)
    }

    #[instrument(skip(self))]
    fn deliver(&self, title: &str, body: &str) {
        sound::play_tone();

        #[cfg(target_os = "macos")]
        {
            if let Err(e) = mac_notification_sys::send_notification(title, None, body, None) {
                tracing::warn!("Unable to show notification: {e}");
            }
        }

        #[cfg(target_os = "windows")]
        {
            let shown = winrt_notification::Toast::new(winrt_notification::Toast::POWERSHELL_APP_ID)
                .title(title)
                .text1(body)
                .duration(winrt_notification::Duration::Short)
                .sound(None)
                .show();
            if let Err(e) = shown {
                tracing::warn!("Unable to show notification: {e}");
            }
        }

        // TODO: Send freedesktop notifications over D-Bus instead of printing
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            println!("{title}\n  {body}");
        }
    }
}
