//! Panel locales and the messages shown to users and moderators
use std::fmt;
use std::str::FromStr;

use isolang::Language;

/// Languages the panels are translated to. Persian is the storefront default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Locale {
    Persian,
    English,
}

impl Default for Locale {
    fn default() -> Self {
        Locale::Persian
    }
}

impl FromStr for Locale {
    type Err = ();

    /// Parses ISO 639-1 codes, region suffixes like `fa-IR` are ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.split(|c| c == '-' || c == '_').next().unwrap_or_default().to_ascii_lowercase();
        match Language::from_639_1(&code).map(|lang| lang.to_639_3()) {
            Some("fas") => Ok(Locale::Persian),
            Some("eng") => Ok(Locale::English),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Locale::Persian => write!(f, "fa"),
            Locale::English => write!(f, "en"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Message {
    EmptyBody,
    BodyTooLong,
    InvalidBody,
    SubmittedForModeration,
    Submitting,
    GenericFailure,
    SelectAtLeastOne,
    BulkApplied,
    CommentUpdated,
    CommentDeleted,
    ConfirmDelete,
    ConfirmBulkDelete,
    AnonymousAuthor,
    NoComments,
    BeFirstToComment,
    NotAllowed,
    NotFound,
    Replies,
    Approved,
    Unapproved,
    Seen,
    Unseen,
    Active,
    Inactive,
}

impl Message {
    pub fn text(self, locale: Locale) -> &'static str {
        match locale {
            Locale::Persian => self.persian(),
            Locale::English => self.english(),
        }
    }

    fn persian(self) -> &'static str {
        match self {
            Message::EmptyBody => "متن دیدگاه نمی‌تواند خالی باشد.",
            Message::BodyTooLong => "متن دیدگاه نباید بیشتر از ۲۰۰۰ کاراکتر باشد.",
            Message::InvalidBody => "متن دیدگاه معتبر نیست.",
            Message::SubmittedForModeration => "دیدگاه شما ثبت شد و پس از تایید مدیر نمایش داده می‌شود.",
            Message::Submitting => "در حال ارسال...",
            Message::GenericFailure => "خطایی رخ داد. لطفا دوباره تلاش کنید.",
            Message::SelectAtLeastOne => "لطفا حداقل یک مورد را انتخاب کنید.",
            Message::BulkApplied => "عملیات گروهی با موفقیت انجام شد.",
            Message::CommentUpdated => "دیدگاه با موفقیت به‌روزرسانی شد.",
            Message::CommentDeleted => "دیدگاه حذف شد.",
            Message::ConfirmDelete => "آیا از حذف این دیدگاه مطمئن هستید؟",
            Message::ConfirmBulkDelete => "آیا از حذف دیدگاه‌های انتخاب‌شده مطمئن هستید؟",
            Message::AnonymousAuthor => "کاربر ناشناس",
            Message::NoComments => "هنوز دیدگاهی برای این مورد ثبت نشده است.",
            Message::BeFirstToComment => "اولین نفری باشید که دیدگاه می‌نویسد.",
            Message::NotAllowed => "شما اجازه انجام این عملیات را ندارید.",
            Message::NotFound => "دیدگاه مورد نظر پیدا نشد.",
            Message::Replies => "پاسخ",
            Message::Approved => "تایید شده",
            Message::Unapproved => "در انتظار تایید",
            Message::Seen => "دیده شده",
            Message::Unseen => "دیده نشده",
            Message::Active => "فعال",
            Message::Inactive => "غیرفعال",
        }
    }

    fn english(self) -> &'static str {
        match self {
            Message::EmptyBody => "Comment text can not be empty.",
            Message::BodyTooLong => "Comment text must not exceed 2000 characters.",
            Message::InvalidBody => "Comment text is invalid.",
            Message::SubmittedForModeration => "Your comment was submitted and will appear after moderation.",
            Message::Submitting => "Sending...",
            Message::GenericFailure => "Something went wrong. Please try again.",
            Message::SelectAtLeastOne => "Please select at least one item.",
            Message::BulkApplied => "Bulk action applied.",
            Message::CommentUpdated => "Comment updated.",
            Message::CommentDeleted => "Comment deleted.",
            Message::ConfirmDelete => "Are you sure you want to delete this comment?",
            Message::ConfirmBulkDelete => "Are you sure you want to delete the selected comments?",
            Message::AnonymousAuthor => "Anonymous user",
            Message::NoComments => "There are no comments yet.",
            Message::BeFirstToComment => "Be the first to leave a comment.",
            Message::NotAllowed => "You are not allowed to do that.",
            Message::NotFound => "Comment not found.",
            Message::Replies => "replies",
            Message::Approved => "approved",
            Message::Unapproved => "pending",
            Message::Seen => "seen",
            Message::Unseen => "unseen",
            Message::Active => "active",
            Message::Inactive => "inactive",
        }
    }
}
