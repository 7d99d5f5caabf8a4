//! Tree nodes and the AVL rebalancing primitives.

/// Owning edge to a subtree.
pub(crate) type Link<K, V> = Option<Box<Node<K, V>>>;

#[derive(Debug, Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    /// Height of the subtree rooted here; a leaf has height 1.
    pub(crate) height: u32,
    pub(crate) left: Link<K, V>,
    pub(crate) right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    pub(crate) fn leaf(key: K, value: V) -> Box<Self> {
        Box::new(Self {
            key,
            value,
            height: 1,
            left: None,
            right: None,
        })
    }

    pub(crate) fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    /// `height(left) - height(right)`.
    pub(crate) fn balance_factor(&self) -> i64 {
        i64::from(height(&self.left)) - i64::from(height(&self.right))
    }
}

pub(crate) fn height<K, V>(link: &Link<K, V>) -> u32 {
    link.as_ref().map_or(0, |node| node.height)
}

/// Restores the AVL property at `link`, assuming both subtrees are already
/// balanced and differ in height by at most two.
pub(crate) fn rebalance<K, V>(link: &mut Link<K, V>) {
    let Some(node) = link.as_deref_mut() else {
        return;
    };
    node.update_height();
    let balance = node.balance_factor();

    if balance > 1 {
        // Left-right: straighten the left child first.
        if node.left.as_deref().map_or(0, Node::balance_factor) < 0 {
            rotate_left(&mut node.left);
        }
        rotate_right(link);
    } else if balance < -1 {
        // Right-left: straighten the right child first.
        if node.right.as_deref().map_or(0, Node::balance_factor) > 0 {
            rotate_right(&mut node.right);
        }
        rotate_left(link);
    }
}

/// ```text
///       root            pivot
///      /    \          /     \
///   pivot    c   →    a      root
///   /   \                   /    \
///  a     b                 b      c
/// ```
pub(crate) fn rotate_right<K, V>(link: &mut Link<K, V>) {
    let Some(mut root) = link.take() else {
        return;
    };
    let Some(mut pivot) = root.left.take() else {
        *link = Some(root);
        return;
    };
    root.left = pivot.right.take();
    root.update_height();
    pivot.right = Some(root);
    pivot.update_height();
    *link = Some(pivot);
}

/// Mirror image of [`rotate_right`].
pub(crate) fn rotate_left<K, V>(link: &mut Link<K, V>) {
    let Some(mut root) = link.take() else {
        return;
    };
    let Some(mut pivot) = root.right.take() else {
        *link = Some(root);
        return;
    };
    root.right = pivot.left.take();
    root.update_height();
    pivot.left = Some(root);
    pivot.update_height();
    *link = Some(pivot);
}

/// Detaches the smallest node of a non-empty subtree.
///
/// Returns the detached node (with both children cleared) and what remains of
/// the subtree, rebalanced along the leftmost path.
pub(crate) fn take_min<K, V>(mut root: Box<Node<K, V>>) -> (Box<Node<K, V>>, Link<K, V>) {
    match root.left.take() {
        None => {
            let rest = root.right.take();
            root.height = 1;
            (root, rest)
        }
        Some(left) => {
            let (min, rest) = take_min(left);
            root.left = rest;
            let mut link = Some(root);
            rebalance(&mut link);
            (min, link)
        }
    }
}
