//! Queue family selection.

use crate::error::Result;
use ash::vk;
use swapinit_core::{checked_index, confirm_or_select, select_first, Selection};

/// Queue family chosen for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentQueue {
    /// Queue family index.
    pub index: u32,
    /// Whether this is the graphics queue family.
    pub shared_with_graphics: bool,
}

/// Find the first queue family supporting every flag in `required`.
pub fn find_queue_family(
    families: &[vk::QueueFamilyProperties],
    required: vk::QueueFlags,
) -> Result<u32> {
    let index = select_first(families, |family| family.queue_flags.contains(required))?;
    Ok(checked_index(index)?)
}

/// Find the first queue family that supports graphics.
pub fn find_graphics_queue_family(families: &[vk::QueueFamilyProperties]) -> Result<u32> {
    find_queue_family(families, vk::QueueFlags::GRAPHICS)
}

/// Choose the queue family that presents to a surface.
///
/// The graphics family is checked first. Only if it cannot present are the
/// other families scanned for one that can. `supports` answers whether a
/// family index can present.
pub fn select_present_queue_family<F>(
    families: &[vk::QueueFamilyProperties],
    graphics: u32,
    mut supports: F,
) -> Result<PresentQueue>
where
    F: FnMut(u32) -> Result<bool>,
{
    let selection = confirm_or_select(families, graphics as usize, |index, _| -> Result<bool> {
        supports(checked_index(index)?)
    })?;

    if let Selection::Fallback(index) = selection {
        tracing::info!(
            "Graphics queue family {graphics} cannot present, using family {index} for presentation"
        );
    }

    Ok(PresentQueue {
        index: checked_index(selection.index())?,
        shared_with_graphics: selection.is_preferred(),
    })
}
