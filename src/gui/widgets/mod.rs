use iced::{
    Alignment::Center,
    Color as IcedColor, Element, Length, Theme, border,
    widget::{button, column, container, row, text},
};

use crate::core::db::Color;

fn parse_color(value: &str) -> Option<IcedColor> {
    let color: Color = value.parse().ok()?;
    Some(IcedColor::from_rgb8(color.r, color.g, color.b))
}

/// Bordered pill in the tag's color. Unparseable colors fall back to the theme's text color.
pub fn tag_chip<'a, Message: 'a>(title: &'a str, color: &str) -> Element<'a, Message> {
    let color = parse_color(color);
    container(text(title).size(14).color_maybe(color))
        .padding([4, 12])
        .style(move |theme: &Theme| {
            let border_color = color.unwrap_or(theme.palette().text);
            container::Style::default().border(
                border::rounded(999.0_f32)
                    .color(border_color)
                    .width(1.0_f32),
            )
        })
        .into()
}

/// Square preview of a draft color next to its input.
pub fn color_swatch<'a, Message: 'a>(color: &str) -> Element<'a, Message> {
    let color = parse_color(color);
    container(text(""))
        .width(Length::Fixed(24.0))
        .height(Length::Fixed(24.0))
        .style(move |theme: &Theme| {
            let style = container::bordered_box(theme);
            match color {
                Some(color) => style.background(color),
                None => style,
            }
        })
        .into()
}

/// Titled frame with a close button, centered in the window.
pub fn modal_frame<'a, Message: Clone + 'a>(
    title: &'a str,
    content: impl Into<Element<'a, Message>>,
    on_close: Message,
) -> Element<'a, Message> {
    let header = row![
        container(text(title).size(24)).width(Length::Fill),
        button(text("Close")).style(button::secondary).on_press(on_close),
    ]
    .align_y(Center);

    let frame = container(column![header, content.into()].spacing(16))
        .padding(20)
        .max_width(640.0_f32)
        .style(|theme: &Theme| {
            let mut style = container::bordered_box(theme);
            style.border.radius = 8.0_f32.into();
            style
        });

    container(frame)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}
