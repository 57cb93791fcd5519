use maud::{Markup, Render, html};

pub fn render_table<const N: usize>(titles: [&'static str; N], items: Vec<[Markup; N]>) -> Markup {
    html! {
        div class="overflow-x-auto" {
            table class="w-full border-collapse border border-gray-200" {
                thead class="bg-gray-100" {
                    tr {
                        @for title in titles {
                            th class="border p-2 text-left" {(title)}
                        }
                    }
                }
                tbody {
                    @for row in items {
                        tr class="hover:bg-gray-50 transition" {
                            @for col in row {
                                td class="border p-2" {(col)}
                            }
                        }
                    }
                }
            }
        }
    }
}

pub fn title(s: impl Render) -> Markup {
    html! {
        h1 class="text-2xl font-bold mb-4 text-center" {(s)}
    }
}

pub fn centered_note(s: impl Render) -> Markup {
    html! {
        div class="text-center" {
            p {(s)}
        }
    }
}
