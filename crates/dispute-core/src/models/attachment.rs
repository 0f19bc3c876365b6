//! Evidence files attached to a dispute.

use bytes::Bytes;

/// Fallback content type when none is known for a file.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// One attached file: original name, content type and payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl Attachment {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let content_type = content_type.into();
        Self {
            name: name.into(),
            content_type: if content_type.trim().is_empty() {
                DEFAULT_CONTENT_TYPE.to_string()
            } else {
                content_type
            },
            data: data.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Ordered list of attachments. Insertion order is preserved and duplicate
/// names are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachmentSet {
    files: Vec<Attachment>,
}

impl AttachmentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every file of `selection` after the existing ones, leaving
    /// `selection` empty. Returns the number of files added.
    pub fn append(&mut self, selection: &mut Vec<Attachment>) -> usize {
        let added = selection.len();
        self.files.append(selection);
        added
    }

    /// Remove the file at `index`, shifting later files down. Out of range is a no-op.
    pub fn remove(&mut self, index: usize) -> Option<Attachment> {
        if index < self.files.len() {
            Some(self.files.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Attachment> {
        self.files.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attachment> {
        self.files.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn total_size(&self) -> usize {
        self.files.iter().map(Attachment::size).sum()
    }
}

impl<'a> IntoIterator for &'a AttachmentSet {
    type Item = &'a Attachment;
    type IntoIter = std::slice::Iter<'a, Attachment>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

impl FromIterator<Attachment> for AttachmentSet {
    fn from_iter<I: IntoIterator<Item = Attachment>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}
