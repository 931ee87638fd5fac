//! Canonical signal names
//!
//! Rule tables and the extractor both refer to signals through these
//! constants, so a renamed signal breaks the build instead of silently never
//! firing.

// Page shape
pub const HAS_PASSWORD_FIELD: &str = "hasPasswordField";
pub const FORM_COUNT: &str = "formCount";
pub const INPUT_FIELD_COUNT: &str = "inputFieldCount";
pub const HAS_SUBMIT_BUTTON: &str = "hasSubmitButton";
pub const HAS_LOGIN_TEXT: &str = "hasLoginText";
pub const HAS_SIGNUP_TEXT: &str = "hasSignupText";
pub const HAS_FORGOT_PASSWORD: &str = "hasForgotPassword";
pub const LIST_ITEM_COUNT: &str = "listItemCount";
pub const HAS_MANY_LIST_ITEMS: &str = "hasManyListItems";
pub const CARD_COUNT: &str = "cardCount";
pub const TABLE_ROW_COUNT: &str = "tableRowCount";
pub const HAS_PAGINATION: &str = "hasPagination";
pub const HAS_FILTER_CONTROLS: &str = "hasFilterControls";
pub const HAS_CHART: &str = "hasChart";
pub const WIDGET_COUNT: &str = "widgetCount";
pub const HAS_SIDEBAR: &str = "hasSidebar";
pub const HAS_BREADCRUMB: &str = "hasBreadcrumb";
pub const HAS_ARTICLE_BODY: &str = "hasArticleBody";
pub const HAS_PRICE: &str = "hasPrice";
pub const HAS_ADD_TO_CART: &str = "hasAddToCart";
pub const HAS_HERO_SECTION: &str = "hasHeroSection";
pub const CTA_COUNT: &str = "ctaCount";
pub const HAS_ERROR_CODE: &str = "hasErrorCode";
pub const HAS_ERROR_HEADING: &str = "hasErrorHeading";
pub const HAS_EMPTY_STATE: &str = "hasEmptyState";
pub const IS_MINIMAL_CONTENT: &str = "isMinimalContent";

// Authentication
pub const HAS_LOGOUT_BUTTON: &str = "hasLogoutButton";
pub const HAS_USER_MENU: &str = "hasUserMenu";
pub const HAS_WELCOME_TEXT: &str = "hasWelcomeText";
pub const HAS_USERNAME_DISPLAY: &str = "hasUsernameDisplay";
pub const HAS_AUTH_COOKIE: &str = "hasAuthCookie";
pub const HAS_LOGIN_LINK: &str = "hasLoginLink";
pub const HAS_SIGNUP_LINK: &str = "hasSignupLink";
pub const HAS_AUTH_REQUIRED_MESSAGE: &str = "hasAuthRequiredMessage";
pub const USERNAME: &str = "username";

// Loading
pub const SPINNER_COUNT: &str = "spinnerCount";
pub const SKELETON_COUNT: &str = "skeletonCount";
pub const PROGRESS_COUNT: &str = "progressCount";
pub const LAZY_LOAD_COUNT: &str = "lazyLoadCount";
pub const BODY_BUSY: &str = "bodyBusy";

// Errors
pub const HAS_PERMISSION_DENIED: &str = "hasPermissionDenied";
pub const HAS_NOT_FOUND: &str = "hasNotFound";
pub const HAS_SERVER_ERROR: &str = "hasServerError";
pub const VALIDATION_ERROR_COUNT: &str = "validationErrorCount";
pub const ERROR_TOAST_COUNT: &str = "errorToastCount";
pub const ERROR_TOAST_TEXT: &str = "errorToastText";
