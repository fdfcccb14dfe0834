use std::convert::Infallible;

use iced::{
    Element, Length, Task,
    widget::{button, column, container, text},
};

use crate::gui::{
    AppState,
    screens::{Screen, ScreenMessage},
};

/// Shown until the workspace is open, or instead of it when opening failed.
#[derive(Debug, Clone)]
pub enum LoadingPageScreen {
    Waiting(String),
    Failed(String),
}

#[derive(Debug, Clone)]
pub enum LoadingPageParentMessage {
    Quit,
}

impl Screen for LoadingPageScreen {
    type Message = Infallible;
    type ParentMessage = LoadingPageParentMessage;

    fn view(&self) -> Element<'_, ScreenMessage<Self>> {
        let content: Element<'_, ScreenMessage<Self>> = match self {
            LoadingPageScreen::Waiting(label) => text(label).into(),
            LoadingPageScreen::Failed(message) => column![
                text("Could not open workspace").size(20),
                text(message).style(text::danger),
                button(text("Quit")).on_press(ScreenMessage::ParentMessage(
                    LoadingPageParentMessage::Quit
                )),
            ]
            .spacing(8)
            .into(),
        };
        container(content)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    fn update(
        &mut self,
        message: Self::Message,
        _state: &mut AppState,
    ) -> Task<ScreenMessage<Self>> {
        match message {}
    }
}
