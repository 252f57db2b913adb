use crate::prelude::*;

///
/// NodeKind
///
/// Structural role of a node in the reflected graph. Top-level nodes are
/// always classes; subobjects and field groups hang beneath them.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[remain::sorted]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    Class {
        class: ClassKind,

        #[serde(default)]
        flags: ClassFlags,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        cull_distance_squared: Option<u64>,
    },
    FieldGroup {
        category: Category,
        fields: Vec<Field>,
    },
    Subobject,
}

///
/// TypeNode
///
/// `path` is the reflector's canonical path and is unique; `name` is the
/// raw, unsanitized identifier. Children keep the reflector's order.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TypeNode {
    pub path: String,
    pub name: String,
    pub kind: NodeKind,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Self>,
}

impl TypeNode {
    #[must_use]
    pub fn new(path: impl Into<String>, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            kind,
            children: Vec::new(),
        }
    }

    /// A hierarchy root class.
    #[must_use]
    pub fn root_class(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self::class(path, name, ClassKind::Root)
    }

    /// A class that is only ever attached to roots as a subobject.
    #[must_use]
    pub fn subobject_class(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self::class(path, name, ClassKind::Subobject)
    }

    fn class(path: impl Into<String>, name: impl Into<String>, class: ClassKind) -> Self {
        Self::new(
            path,
            name,
            NodeKind::Class {
                class,
                flags: ClassFlags::default(),
                cull_distance_squared: None,
            },
        )
    }

    /// A static subobject slot of a class (or of another subobject).
    #[must_use]
    pub fn subobject(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(path, name, NodeKind::Subobject)
    }

    /// Append a field group child.
    #[must_use]
    pub fn with_fields(mut self, category: Category, fields: Vec<Field>) -> Self {
        let path = format!("{}[{category}]", self.path);
        self.children.push(Self::new(
            path,
            category.to_string(),
            NodeKind::FieldGroup { category, fields },
        ));
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn with_flags(mut self, new_flags: ClassFlags) -> Self {
        if let NodeKind::Class { flags, .. } = &mut self.kind {
            *flags = new_flags;
        }
        self
    }

    #[must_use]
    pub fn with_cull_distance(mut self, distance_squared: u64) -> Self {
        if let NodeKind::Class {
            cull_distance_squared,
            ..
        } = &mut self.kind
        {
            *cull_distance_squared = Some(distance_squared);
        }
        self
    }

    //
    // accessors
    //

    #[must_use]
    pub const fn is_class(&self) -> bool {
        matches!(self.kind, NodeKind::Class { .. })
    }

    #[must_use]
    pub const fn class_kind(&self) -> Option<ClassKind> {
        match &self.kind {
            NodeKind::Class { class, .. } => Some(*class),
            _ => None,
        }
    }

    #[must_use]
    pub const fn class_flags(&self) -> Option<ClassFlags> {
        match &self.kind {
            NodeKind::Class { flags, .. } => Some(*flags),
            _ => None,
        }
    }

    #[must_use]
    pub const fn cull_distance_squared(&self) -> Option<u64> {
        match &self.kind {
            NodeKind::Class {
                cull_distance_squared,
                ..
            } => *cull_distance_squared,
            _ => None,
        }
    }

    /// Field groups directly beneath this node, in reflector order.
    pub fn field_groups(&self) -> impl Iterator<Item = (Category, &[Field])> {
        self.children.iter().filter_map(|child| match &child.kind {
            NodeKind::FieldGroup { category, fields } => Some((*category, fields.as_slice())),
            _ => None,
        })
    }

    /// All fields of one category. Validation guarantees at most one group
    /// per category, but concatenating keeps this total.
    #[must_use]
    pub fn fields(&self, category: Category) -> Vec<&Field> {
        self.field_groups()
            .filter(|(c, _)| *c == category)
            .flat_map(|(_, fields)| fields)
            .collect()
    }

    /// Categories that carry at least one field, in emission order.
    #[must_use]
    pub fn applicable_categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|category| !self.fields(*category).is_empty())
            .collect()
    }

    /// Static subobjects directly beneath this node.
    pub fn subobjects(&self) -> impl Iterator<Item = &Self> {
        self.children
            .iter()
            .filter(|child| matches!(child.kind, NodeKind::Subobject))
    }
}

///
/// TESTS
///
