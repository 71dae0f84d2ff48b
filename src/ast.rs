#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Literal(String),
    VariableRef(String), // $name
    Block {
        alias: Option<String>,        // $[:alias: ...]
        primary: Vec<Node>,           // before the divider
        fallback: Option<Vec<Node>>, // after the divider, if any
    },
}

/// A parsed formula: top-level nodes with no enclosing block.
pub type Formula = Vec<Node>;
