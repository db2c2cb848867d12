use crate::overlay::dialog::DialogController;
use crate::overlay::form_dialog::FormDialogController;
use crate::overlay::loading::LoadingScreen;

/// Seam for the one piece of shared host state the overlays mutate: the
/// inert/aria-hidden toggling on the document's main content regions.
pub trait BackdropHost {
    fn set_inert(&mut self, inert: bool);
}

/// Derived projection of "some overlay is open". The producers are not
/// reference-counted: the attribute is boolean and any active overlay
/// wants it set, so the projection is a plain OR and writes only happen
/// on transitions.
#[derive(Debug, Default)]
pub struct Backdrop {
    visible: bool,
}

impl Backdrop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn sync(
        &mut self,
        dialog: &DialogController,
        form_dialog: &FormDialogController,
        loading: &LoadingScreen,
        host: &mut dyn BackdropHost,
    ) {
        let open = dialog.is_open() || form_dialog.is_open() || loading.is_visible();
        if self.visible != open {
            self.visible = open;
            host.set_inert(open);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Backdrop, BackdropHost};
    use crate::overlay::dialog::{DialogConfig, DialogController};
    use crate::overlay::form_dialog::FormDialogController;
    use crate::overlay::loading::LoadingScreen;
    use std::time::Instant;

    #[derive(Default)]
    struct RecordingHost {
        writes: Vec<bool>,
    }

    impl BackdropHost for RecordingHost {
        fn set_inert(&mut self, inert: bool) {
            self.writes.push(inert);
        }
    }

    #[test]
    fn backdrop_follows_any_open_overlay() {
        let mut backdrop = Backdrop::new();
        let mut dialog = DialogController::new();
        let form_dialog = FormDialogController::new();
        let mut loading = LoadingScreen::new();
        let mut host = RecordingHost::default();
        let now = Instant::now();

        backdrop.sync(&dialog, &form_dialog, &loading, &mut host);
        assert!(host.writes.is_empty());

        dialog.open(DialogConfig::new("Delete plushie?", "This cannot be undone."));
        backdrop.sync(&dialog, &form_dialog, &loading, &mut host);
        assert_eq!(host.writes, vec![true]);

        // A second overlay opening does not rewrite the attribute.
        loading.set(None, Some("Saving".to_string()), now);
        backdrop.sync(&dialog, &form_dialog, &loading, &mut host);
        assert_eq!(host.writes, vec![true]);

        dialog.close();
        backdrop.sync(&dialog, &form_dialog, &loading, &mut host);
        assert_eq!(host.writes, vec![true], "loading screen still holds the backdrop");
    }
}
