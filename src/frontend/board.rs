use yew::prelude::*;
use web_sys::{HtmlElement, MouseEvent};

#[derive(Properties, PartialEq)]
pub struct Props {
    pub fen: String,
    /// Legal moves in UCI notation; empty when the user may not move.
    pub valid_moves: Vec<String>,
    /// Draw the board from Black's side.
    #[prop_or_default]
    pub flipped: bool,
    pub onmove: Callback<(String, String)>,
}

pub struct ChessBoard {
    selected_square: Option<String>,
    board_ref: NodeRef,
}

pub enum Msg {
    SquareClick(String),
}

impl Component for ChessBoard {
    type Message = Msg;
    type Properties = Props;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            selected_square: None,
            board_ref: NodeRef::default(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::SquareClick(square) => {
                if let Some(selected) = self.selected_square.take() {
                    if let Some(pair) = legal_move(&ctx.props().valid_moves, &selected, &square) {
                        ctx.props().onmove.emit(pair);
                        return true;
                    }
                }
                if self.has_moves_from(ctx, &square) {
                    self.selected_square = Some(square);
                }
                true
            }
        }
    }

    fn changed(&mut self, _ctx: &Context<Self>, _old_props: &Self::Properties) -> bool {
        self.selected_square = None;
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let board_ref = self.board_ref.clone();
        let flipped = ctx.props().flipped;
        let onclick = ctx.link().batch_callback(move |e: MouseEvent| {
            let board = board_ref.cast::<HtmlElement>()?;
            let rect = board.get_bounding_client_rect();
            let square_size = rect.width() / 8.0;
            let x = ((e.client_x() as f64 - rect.left()) / square_size) as i32;
            let y = ((e.client_y() as f64 - rect.top()) / square_size) as i32;
            if !(0..8).contains(&x) || !(0..8).contains(&y) {
                return None;
            }
            let (file, rank) = screen_to_board(y, x, flipped);
            Some(Msg::SquareClick(square_name(file, rank)))
        });

        html! {
            <div class="relative w-full aspect-square" ref={self.board_ref.clone()}>
                <div
                    class="absolute inset-0 grid grid-cols-8 grid-rows-8 bg-white cursor-pointer"
                    onclick={onclick}
                >
                    { self.render_squares(ctx) }
                    { self.render_pieces(ctx) }
                </div>
            </div>
        }
    }
}

impl ChessBoard {
    fn has_moves_from(&self, ctx: &Context<Self>, square: &str) -> bool {
        ctx.props().valid_moves.iter().any(|m| m.starts_with(square))
    }

    fn render_squares(&self, ctx: &Context<Self>) -> Html {
        let targets: Vec<&str> = match &self.selected_square {
            Some(selected) => ctx
                .props()
                .valid_moves
                .iter()
                .filter_map(|m| m.strip_prefix(selected.as_str()))
                .collect(),
            None => Vec::new(),
        };

        let mut squares = Vec::new();
        for row in 0..8 {
            for col in 0..8 {
                let (file, rank) = screen_to_board(row, col, ctx.props().flipped);
                let is_dark = (rank + file) % 2 == 0;
                let square = square_name(file, rank);
                let is_selected = self.selected_square.as_ref() == Some(&square);
                let is_target = targets.iter().any(|t| t.starts_with(&square));
                let bg_color = if is_selected {
                    "bg-yellow-200"
                } else if is_target {
                    "bg-green-200"
                } else if is_dark {
                    "bg-gray-400"
                } else {
                    "bg-gray-200"
                };

                squares.push(html! {
                    <div class={classes!("border", "border-gray-300", bg_color)}></div>
                });
            }
        }
        html! { <>{squares}</> }
    }

    fn render_pieces(&self, ctx: &Context<Self>) -> Html {
        let flipped = ctx.props().flipped;
        // Only the piece placement field is drawn.
        let placement = ctx.props().fen.split_whitespace().next().unwrap_or_default();

        let mut pieces = Vec::new();
        for (rank_idx, rank) in placement.split('/').enumerate() {
            let mut file_idx = 0;
            for c in rank.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file_idx += skip as usize;
                    continue;
                }
                if file_idx >= 8 || rank_idx >= 8 {
                    break;
                }
                let piece_type = match c.to_ascii_lowercase() {
                    'p' => "pawn",
                    'n' => "knight",
                    'b' => "bishop",
                    'r' => "rook",
                    'q' => "queen",
                    'k' => "king",
                    _ => continue,
                };
                let color = if c.is_ascii_uppercase() { "white" } else { "black" };
                let (col, row) = if flipped {
                    (7 - file_idx, 7 - rank_idx)
                } else {
                    (file_idx, rank_idx)
                };
                let left = format!("{}%", (col as f32 / 8.0) * 100.0);
                let top = format!("{}%", (row as f32 / 8.0) * 100.0);

                pieces.push(html! {
                    <div
                        class="absolute w-1/8 h-1/8 flex items-center justify-center"
                        style={format!("left: {}; top: {}", left, top)}
                    >
                        <img
                            src={format!("/assets/pieces/{}-{}.svg", color, piece_type)}
                            alt={format!("{} {}", color, piece_type)}
                            class="w-full h-full pointer-events-none"
                        />
                    </div>
                });
                file_idx += 1;
            }
        }
        html! { <>{pieces}</> }
    }
}

/// Legal move going from `orig` to `dest`, split as (origin, destination).
/// The destination keeps the promotion suffix of the move (`e8q`), a queen
/// when several promotions are possible.
fn legal_move(valid_moves: &[String], orig: &str, dest: &str) -> Option<(String, String)> {
    let candidate = format!("{}{}", orig, dest);
    let mut matching = valid_moves.iter().filter(|m| m.starts_with(&candidate));
    let first = matching.next()?;
    let chosen = if first.len() > candidate.len() {
        std::iter::once(first)
            .chain(matching)
            .find(|m| m.ends_with('q'))
            .unwrap_or(first)
    } else {
        first
    };
    Some((orig.to_string(), chosen[orig.len()..].to_string()))
}

/// Board coordinates (file, rank), both 0-based from a1, of the square
/// drawn at `row`, `col` counted from the top left.
fn screen_to_board(row: i32, col: i32, flipped: bool) -> (i32, i32) {
    if flipped {
        (7 - col, row)
    } else {
        (col, 7 - row)
    }
}

fn square_name(file: i32, rank: i32) -> String {
    format!("{}{}", (b'a' + file as u8) as char, rank + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moves(list: &[&str]) -> Vec<String> {
        list.iter().map(|m| m.to_string()).collect()
    }

    #[test]
    fn plain_move_is_split_into_squares() {
        let valid = moves(&["e2e4", "e2e3", "g1f3"]);

        assert_eq!(legal_move(&valid, "e2", "e4"), Some(("e2".to_string(), "e4".to_string())));
        assert_eq!(legal_move(&valid, "e2", "e5"), None);
    }

    #[test]
    fn promotion_keeps_its_suffix() {
        let valid = moves(&["e7e8n", "e7e8b", "e7e8r", "e7e8q", "a2a3"]);

        let (orig, dest) = legal_move(&valid, "e7", "e8").unwrap();

        assert_eq!(format!("{}{}", orig, dest), "e7e8q");
        assert!(valid.contains(&format!("{}{}", orig, dest)));
    }

    #[test]
    fn single_underpromotion_is_used_as_is() {
        let valid = moves(&["b7b8n"]);

        assert_eq!(legal_move(&valid, "b7", "b8"), Some(("b7".to_string(), "b8n".to_string())));
    }

    #[test]
    fn flipped_board_maps_top_left_to_h1() {
        assert_eq!(screen_to_board(0, 0, false), (0, 7));
        assert_eq!(screen_to_board(0, 0, true), (7, 0));
        assert_eq!(square_name(7, 0), "h1");
    }
}
