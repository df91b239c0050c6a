//! Editor accessor: resolves the active surface and decides whether the
//! engine may act on it.
//!
//! The engine's listeners stay attached for the whole application lifetime,
//! so every entry point goes through [`resolve_editable`] and becomes a no-op
//! when the surface is gone, hidden or disabled.

use crate::actions::SurfaceId;
use crate::error::InputError;
use crate::platform::{EditorHost, Surface};

/// Whether the surface is shown and accepts input.
pub fn is_editable<S: Surface + ?Sized>(surface: &S) -> bool {
    surface.is_displayed() && surface.is_visible() && !surface.is_disabled()
}

/// Resolve `id` to a surface the engine is allowed to mutate.
pub fn resolve_editable<'h, H: EditorHost>(
    host: &'h mut H,
    id: &SurfaceId,
) -> Result<&'h mut H::Surface, InputError> {
    let surface = host
        .resolve(id)
        .ok_or_else(|| InputError::Unresolved(id.clone()))?;
    if !is_editable(surface) {
        return Err(InputError::NotEditable(id.clone()));
    }
    Ok(surface)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{HeadlessHost, HeadlessSurface};

    #[test]
    fn test_visible_enabled_surface_is_editable() {
        let surface = HeadlessSurface::new("hello");
        assert!(is_editable(&surface));
    }

    #[test]
    fn test_hidden_or_disabled_is_not_editable() {
        let mut surface = HeadlessSurface::new("hello");
        surface.set_displayed(false);
        assert!(!is_editable(&surface));

        let mut surface = HeadlessSurface::new("hello");
        surface.set_visible(false);
        assert!(!is_editable(&surface));

        let mut surface = HeadlessSurface::new("hello");
        surface.set_disabled(true);
        assert!(!is_editable(&surface));
    }

    #[test]
    fn test_resolve_errors() {
        let mut host = HeadlessHost::new("editor", HeadlessSurface::new(""));
        assert!(resolve_editable(&mut host, &"editor".into()).is_ok());
        assert_eq!(
            resolve_editable(&mut host, &"other".into()).err(),
            Some(InputError::Unresolved("other".into()))
        );

        host.surface_mut().set_disabled(true);
        assert_eq!(
            resolve_editable(&mut host, &"editor".into()).err(),
            Some(InputError::NotEditable("editor".into()))
        );
    }
}
