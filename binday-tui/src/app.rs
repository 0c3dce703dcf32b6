use binday_core::controller::{ResolutionController, ViewState};
use tokio::sync::watch;

pub(crate) struct App {
    pub controller: ResolutionController,
    state_rx: watch::Receiver<ViewState>,
    pub view: ViewState,
    pub candidate_index: usize,
}

impl App {
    pub(crate) fn new(controller: ResolutionController) -> Self {
        let state_rx = controller.subscribe();
        let view = controller.state();
        Self {
            controller,
            state_rx,
            view,
            candidate_index: 0,
        }
    }

    /// Pull the latest controller snapshot into the render state.
    pub(crate) fn refresh(&mut self) {
        let view = self.state_rx.borrow_and_update().clone();
        // Keep the cursor inside the candidate list as results change.
        if self.candidate_index >= view.candidates.len() {
            self.candidate_index = 0;
        }
        self.view = view;
    }

    pub(crate) fn select_previous(&mut self) {
        if self.candidate_index > 0 {
            self.candidate_index -= 1;
        }
    }

    pub(crate) fn select_next(&mut self) {
        if self.candidate_index + 1 < self.view.candidates.len() {
            self.candidate_index += 1;
        }
    }

    pub(crate) fn pick_current(&self) {
        if let Some(address) = self.view.candidates.get(self.candidate_index) {
            self.controller.on_address_picked(address.clone());
        }
    }

    pub(crate) fn push_input(&self, character: char) {
        let mut text = self.view.postcode.clone();
        text.push(character);
        self.controller.on_postcode_changed(&text);
    }

    pub(crate) fn pop_input(&self) {
        let mut text = self.view.postcode.clone();
        text.pop();
        self.controller.on_postcode_changed(&text);
    }
}
