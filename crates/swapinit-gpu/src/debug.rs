//! Debug messenger routing validation output into `tracing`.

use crate::error::Result;
use ash::vk;
use std::borrow::Cow;
use std::ffi::{c_char, c_void, CStr};
use std::fmt::Write;

/// Message ids that are filtered out in debug builds.
///
/// - `0`: loader override paths notice
/// - `0x822806fa`: warning that `VK_EXT_debug_utils` is enabled
/// - `0xe8d1a9fe`: validation layers are a debug build
pub const SUPPRESSED_MESSAGE_IDS: [u32; 3] = [0, 0x8228_06fa, 0xe8d1_a9fe];

/// Reinterpret the signed id number from the callback data as the id the
/// validation layers print.
pub const fn message_id(number: i32) -> u32 {
    u32::from_ne_bytes(number.to_ne_bytes())
}

/// Whether a message id is one of [`SUPPRESSED_MESSAGE_IDS`].
pub fn is_suppressed(message_id: u32) -> bool {
    SUPPRESSED_MESSAGE_IDS.contains(&message_id)
}

/// Create info used both for the messenger and for instance creation.
pub fn messenger_create_info() -> vk::DebugUtilsMessengerCreateInfoEXT<'static> {
    vk::DebugUtilsMessengerCreateInfoEXT::default()
        .message_severity(
            vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
                | vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
        )
        .message_type(
            vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
        )
        .pfn_user_callback(Some(debug_callback))
}

/// Owns a debug utils messenger; destroyed on drop.
pub struct DebugMessenger {
    loader: ash::ext::debug_utils::Instance,
    messenger: vk::DebugUtilsMessengerEXT,
}

impl DebugMessenger {
    /// Install the messenger on an instance.
    ///
    /// # Safety
    /// The instance must be valid, have `VK_EXT_debug_utils` enabled, and
    /// outlive the messenger.
    pub unsafe fn new(entry: &ash::Entry, instance: &ash::Instance) -> Result<Self> {
        let loader = ash::ext::debug_utils::Instance::new(entry, instance);
        // SAFETY: caller guarantees the extension is enabled
        let messenger =
            unsafe { loader.create_debug_utils_messenger(&messenger_create_info(), None) }?;
        Ok(Self { loader, messenger })
    }
}

impl Drop for DebugMessenger {
    fn drop(&mut self) {
        tracing::debug!("Destroying debug messenger");
        unsafe {
            self.loader
                .destroy_debug_utils_messenger(self.messenger, None);
        }
    }
}

fn lossy<'a>(ptr: *const c_char) -> Cow<'a, str> {
    if ptr.is_null() {
        Cow::from("")
    } else {
        // SAFETY: non-null strings in callback data are NUL-terminated
        unsafe { CStr::from_ptr(ptr) }.to_string_lossy()
    }
}

/// Render the callback payload in the same layout the validation layers use
/// in their own console output.
///
/// # Safety
/// All counts and pointers in `data` must be consistent.
unsafe fn format_message(
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    data: &vk::DebugUtilsMessengerCallbackDataEXT<'_>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{message_type:?}:");
    let _ = writeln!(out, "\tmessageIDName   = <{}>", lossy(data.p_message_id_name));
    let _ = writeln!(out, "\tmessageIdNumber = {}", data.message_id_number);
    let _ = write!(out, "\tmessage         = <{}>", lossy(data.p_message));

    if data.queue_label_count > 0 && !data.p_queue_labels.is_null() {
        let _ = write!(out, "\n\tQueue Labels:");
        // SAFETY: pointer and count come from the same callback data
        let labels = unsafe {
            std::slice::from_raw_parts(data.p_queue_labels, data.queue_label_count as usize)
        };
        for label in labels {
            let _ = write!(out, "\n\t\tlabelName = <{}>", lossy(label.p_label_name));
        }
    }

    if data.cmd_buf_label_count > 0 && !data.p_cmd_buf_labels.is_null() {
        let _ = write!(out, "\n\tCommandBuffer Labels:");
        // SAFETY: pointer and count come from the same callback data
        let labels = unsafe {
            std::slice::from_raw_parts(data.p_cmd_buf_labels, data.cmd_buf_label_count as usize)
        };
        for label in labels {
            let _ = write!(out, "\n\t\tlabelName = <{}>", lossy(label.p_label_name));
        }
    }

    if data.object_count > 0 && !data.p_objects.is_null() {
        let _ = write!(out, "\n\tObjects:");
        // SAFETY: pointer and count come from the same callback data
        let objects =
            unsafe { std::slice::from_raw_parts(data.p_objects, data.object_count as usize) };
        for (i, object) in objects.iter().enumerate() {
            let _ = write!(out, "\n\t\tObject {i}");
            let _ = write!(out, "\n\t\t\tobjectType   = {:?}", object.object_type);
            let _ = write!(out, "\n\t\t\tobjectHandle = {:#x}", object.object_handle);
            if !object.p_object_name.is_null() {
                let _ = write!(out, "\n\t\t\tobjectName   = <{}>", lossy(object.p_object_name));
            }
        }
    }

    out
}

unsafe extern "system" fn debug_callback(
    message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    p_callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT<'_>,
    _user_data: *mut c_void,
) -> vk::Bool32 {
    // SAFETY: the loader passes either null or valid callback data
    let Some(data) = (unsafe { p_callback_data.as_ref() }) else {
        return vk::FALSE;
    };

    if cfg!(debug_assertions) && is_suppressed(message_id(data.message_id_number)) {
        return vk::FALSE;
    }

    // SAFETY: data comes straight from the loader
    let message = unsafe { format_message(message_type, data) };

    match message_severity {
        vk::DebugUtilsMessageSeverityFlagsEXT::ERROR => tracing::error!("{message}"),
        vk::DebugUtilsMessageSeverityFlagsEXT::WARNING => tracing::warn!("{message}"),
        vk::DebugUtilsMessageSeverityFlagsEXT::INFO => tracing::info!("{message}"),
        _ => tracing::debug!("{message}"),
    }

    // Only layer developers return TRUE here
    vk::FALSE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_noise_is_suppressed() {
        assert!(is_suppressed(0));
        assert!(is_suppressed(0x8228_06fa));
        assert!(is_suppressed(0xe8d1_a9fe));
        assert!(!is_suppressed(0x1234_5678));
    }

    #[test]
    fn negative_message_ids_map_to_their_bit_pattern() {
        let number = i32::from_ne_bytes(0xe8d1_a9fe_u32.to_ne_bytes());
        assert!(number < 0);
        assert_eq!(message_id(number), 0xe8d1_a9fe);
        assert!(is_suppressed(message_id(number)));
        assert_eq!(message_id(7), 7);
    }

    #[test]
    fn create_info_covers_warnings_and_errors() {
        let info = messenger_create_info();
        assert!(info
            .message_severity
            .contains(vk::DebugUtilsMessageSeverityFlagsEXT::WARNING));
        assert!(info
            .message_severity
            .contains(vk::DebugUtilsMessageSeverityFlagsEXT::ERROR));
        assert!(!info
            .message_severity
            .contains(vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE));
        assert!(info.pfn_user_callback.is_some());
    }

    #[test]
    fn message_formatting_includes_labels_and_objects() {
        let label = vk::DebugUtilsLabelEXT::default().label_name(c"frame");
        let labels = [label];
        let object = vk::DebugUtilsObjectNameInfoEXT {
            object_type: vk::ObjectType::INSTANCE,
            object_handle: 0x42,
            ..Default::default()
        };
        let objects = [object];
        let data = vk::DebugUtilsMessengerCallbackDataEXT::default()
            .message_id_name(c"VUID-test")
            .message_id_number(7)
            .message(c"something happened")
            .queue_labels(&labels)
            .objects(&objects);

        let text = unsafe { format_message(vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION, &data) };
        assert!(text.contains("messageIDName   = <VUID-test>"));
        assert!(text.contains("messageIdNumber = 7"));
        assert!(text.contains("message         = <something happened>"));
        assert!(text.contains("Queue Labels:"));
        assert!(text.contains("labelName = <frame>"));
        assert!(text.contains("objectHandle = 0x42"));
        assert!(!text.contains("CommandBuffer Labels:"));
        assert!(!text.contains("objectName"));
    }
}
