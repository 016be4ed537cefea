//! Composite: archivos y directorios se tratan igual a través de un trait.

pub trait FileSystemComponent {
    fn name(&self) -> &str;
    /// Tamaño en KB, sumando descendientes
    fn size(&self) -> u64;
    fn render(&self, indent: &str, out: &mut String);
}

pub struct File {
    name: String,
    size: u64,
}

impl File {
    pub fn new(name: &str, size: u64) -> Self {
        File {
            name: name.to_string(),
            size,
        }
    }
}

impl FileSystemComponent for File {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn render(&self, indent: &str, out: &mut String) {
        out.push_str(&format!("{}file: {} ({} KB)\n", indent, self.name, self.size));
    }
}

pub struct Directory {
    name: String,
    children: Vec<Box<dyn FileSystemComponent>>,
}

impl Directory {
    pub fn new(name: &str) -> Self {
        Directory {
            name: name.to_string(),
            children: Vec::new(),
        }
    }

    pub fn add(&mut self, component: Box<dyn FileSystemComponent>) {
        self.children.push(component);
    }

    /// Quita el primer hijo directo con ese nombre
    pub fn remove(&mut self, name: &str) -> bool {
        match self.children.iter().position(|c| c.name() == name) {
            Some(index) => {
                self.children.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn tree(&self) -> String {
        let mut out = String::new();
        self.render("", &mut out);
        out
    }
}

impl FileSystemComponent for Directory {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.children.iter().map(|c| c.size()).sum()
    }

    fn render(&self, indent: &str, out: &mut String) {
        out.push_str(&format!("{}dir: {}\n", indent, self.name));
        let nested = format!("{}  ", indent);
        for child in &self.children {
            child.render(&nested, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Directory {
        let mut docs = Directory::new("docs");
        docs.add(Box::new(File::new("notes.txt", 4)));

        let mut root = Directory::new("root");
        root.add(Box::new(File::new("readme.md", 2)));
        root.add(Box::new(docs));
        root
    }

    #[test]
    fn test_size_is_recursive() {
        assert_eq!(sample().size(), 6);
        assert_eq!(Directory::new("empty").size(), 0);
    }

    #[test]
    fn test_tree_indents_children() {
        assert_eq!(
            sample().tree(),
            "dir: root\n  file: readme.md (2 KB)\n  dir: docs\n    file: notes.txt (4 KB)\n"
        );
    }

    #[test]
    fn test_remove_by_name() {
        let mut root = sample();
        assert!(root.remove("docs"));
        assert!(!root.remove("docs"));
        assert_eq!(root.size(), 2);
    }
}
