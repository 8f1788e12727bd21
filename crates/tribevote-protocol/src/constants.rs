/// Separator between the name and the vote count in a packed tribe record.
/// Never allowed inside a tribe or area name.
pub const RECORD_SEPARATOR: char = '$';

/// The only non-letter character allowed in names.
pub const NAME_SPACE: char = ' ';

/// First lowercase letter accepted in names.
pub const FIRST_NAME_LETTER: char = 'a';

/// Last lowercase letter accepted in names.
pub const LAST_NAME_LETTER: char = 'z';

/// Radix used when rendering ids as map keys.
pub const KEY_RADIX: u32 = 10;

/// Vote count every tribe starts with in a freshly added roster entry.
pub const INITIAL_VOTES: u64 = 0;
