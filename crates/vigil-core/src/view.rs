use std::fmt;
use std::rc::Rc;

use crate::Rect;
use crate::tree::NodeId;

/// A user action attached to a view. Failures travel back to whoever
/// triggered the action.
pub type Action = Rc<dyn Fn() -> anyhow::Result<()>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Button,
    Menu,
    MenuItem,
    Dialog,
    Status,
    Tab,
    TabPanel,
}

#[derive(Clone)]
pub enum ViewKind {
    Box,
    Row,
    Column,
    Text { text: String },
    Button { text: String, on_click: Option<Action> },
}

impl fmt::Debug for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewKind::Box => f.write_str("Box"),
            ViewKind::Row => f.write_str("Row"),
            ViewKind::Column => f.write_str("Column"),
            ViewKind::Text { text } => f.debug_struct("Text").field("text", text).finish(),
            ViewKind::Button { text, on_click } => f
                .debug_struct("Button")
                .field("text", text)
                .field("on_click", &on_click.is_some())
                .finish(),
        }
    }
}

/// Description of what a consumer wants on screen. Producing one has no side
/// effects; mounting it is the [`crate::Stage`]'s job.
#[derive(Clone, Debug)]
pub struct View {
    /// Assigned when the view is mounted.
    pub id: Option<NodeId>,
    pub kind: ViewKind,
    pub class: Option<String>,
    pub role: Option<Role>,
    /// Layout result, filled in by the host when it knows it.
    pub bounds: Option<Rect>,
    pub children: Vec<View>,
}

impl View {
    pub fn new(kind: ViewKind) -> Self {
        View {
            id: None,
            kind,
            class: None,
            role: None,
            bounds: None,
            children: vec![],
        }
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn bounds(mut self, bounds: Rect) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_children(mut self, kids: Vec<View>) -> Self {
        self.children = kids;
        self
    }

    pub fn child(mut self, kid: View) -> Self {
        self.children.push(kid);
        self
    }

    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            ViewKind::Text { text } | ViewKind::Button { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Depth-first search, self included.
    pub fn find(&self, pred: &dyn Fn(&View) -> bool) -> Option<&View> {
        if pred(self) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(pred))
    }

    pub fn find_text(&self, text: &str) -> Option<&View> {
        self.find(&|v| v.text() == Some(text))
    }

    /// Runs this view's action. Views without one are inert.
    pub fn click(&self) -> anyhow::Result<()> {
        match &self.kind {
            ViewKind::Button {
                on_click: Some(action),
                ..
            } => action(),
            _ => Ok(()),
        }
    }

    pub fn walk(&self, f: &mut dyn FnMut(&View, usize)) {
        fn go(v: &View, depth: usize, f: &mut dyn FnMut(&View, usize)) {
            f(v, depth);
            for c in &v.children {
                go(c, depth + 1, f);
            }
        }
        go(self, 0, f)
    }

    /// Indented, one-line-per-node rendering used by logs and tests, e.g.
    /// `Text.toast-message.success "Saved"`.
    pub fn outline(&self) -> String {
        let mut lines = Vec::new();
        self.walk(&mut |v, depth| {
            let mut line = "  ".repeat(depth);
            let name = match &v.kind {
                ViewKind::Box => "Box",
                ViewKind::Row => "Row",
                ViewKind::Column => "Column",
                ViewKind::Text { .. } => "Text",
                ViewKind::Button { .. } => "Button",
            };
            line.push_str(name);
            if let Some(class) = &v.class {
                for part in class.split_whitespace() {
                    line.push('.');
                    line.push_str(part);
                }
            }
            if let Some(text) = v.text() {
                line.push_str(&format!(" {text:?}"));
            }
            lines.push(line);
        });
        lines.join("\n")
    }
}

#[allow(non_snake_case)]
pub fn Box() -> View {
    View::new(ViewKind::Box)
}

#[allow(non_snake_case)]
pub fn Row() -> View {
    View::new(ViewKind::Row)
}

#[allow(non_snake_case)]
pub fn Column() -> View {
    View::new(ViewKind::Column)
}

#[allow(non_snake_case)]
pub fn Text(text: impl Into<String>) -> View {
    View::new(ViewKind::Text { text: text.into() })
}

/// Button whose action cannot fail.
#[allow(non_snake_case)]
pub fn Button(text: impl Into<String>, on_click: impl Fn() + 'static) -> View {
    TryButton(text, move || {
        on_click();
        Ok(())
    })
}

#[allow(non_snake_case)]
pub fn TryButton(
    text: impl Into<String>,
    on_click: impl Fn() -> anyhow::Result<()> + 'static,
) -> View {
    View::new(ViewKind::Button {
        text: text.into(),
        on_click: Some(Rc::new(on_click)),
    })
    .role(Role::Button)
}
